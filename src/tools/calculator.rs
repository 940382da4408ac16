//! Calculator Tools
//!
//! Stateless conversion and packing calculations. Nothing here touches the
//! database; callers pass every input explicitly.

use serde::Serialize;

use crate::models::{BoxConfig, CalculationResult, Dimensions, PalletDefinition};
use crate::packing::{calculate_line_metrics, calculate_pallet_fit, PalletFit};
use crate::units::{display_volume, round_dimensions, Length, UnitSystem, Weight};

/// A single converted measurement
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub value: f64,
    pub unit: &'static str,
    pub unit_system: UnitSystem,
    pub original_value: f64,
    pub original_unit: &'static str,
}

/// Response for convert_box
#[derive(Debug, Serialize)]
pub struct ConvertBoxResponse {
    pub unit_system: UnitSystem,
    pub box_config: BoxConfig,
    pub length_unit: &'static str,
    pub weight_unit: &'static str,
}

/// Response for pallet_fit
#[derive(Debug, Serialize)]
pub struct PalletFitResponse {
    #[serde(flatten)]
    pub fit: PalletFit,
    pub unit_system: UnitSystem,
}

/// Response for line_metrics
#[derive(Debug, Serialize)]
pub struct LineMetricsResponse {
    pub unit_system: UnitSystem,
    #[serde(flatten)]
    pub result: CalculationResult,
    pub pallets_to_order: u64,
    pub weight_unit: &'static str,
    pub volume_display: f64,
    pub volume_display_unit: &'static str,
}

/// Convert a length given in `from` into the other system
pub fn convert_length(value: f64, from: UnitSystem) -> Result<ConvertResponse, String> {
    if !value.is_finite() {
        return Err("Length must be a finite number".to_string());
    }
    let converted = Length::new(value, from).to(from.other());
    Ok(ConvertResponse {
        value: converted.value,
        unit: converted.system.length_label(),
        unit_system: converted.system,
        original_value: value,
        original_unit: from.length_label(),
    })
}

/// Convert a weight given in `from` into the other system
pub fn convert_weight(value: f64, from: UnitSystem) -> Result<ConvertResponse, String> {
    if !value.is_finite() {
        return Err("Weight must be a finite number".to_string());
    }
    let converted = Weight::new(value, from).to(from.other());
    Ok(ConvertResponse {
        value: converted.value,
        unit: converted.system.weight_label(),
        unit_system: converted.system,
        original_value: value,
        original_unit: from.weight_label(),
    })
}

/// Convert a carton between systems, optionally rounding the extents
pub fn convert_box(
    box_config: &BoxConfig,
    from: UnitSystem,
    to: UnitSystem,
    round: bool,
) -> ConvertBoxResponse {
    let mut converted = box_config.convert(from, to);
    if round {
        converted.dimensions = round_dimensions(&converted.dimensions);
    }
    ConvertBoxResponse {
        unit_system: to,
        box_config: converted,
        length_unit: to.length_label(),
        weight_unit: to.weight_label(),
    }
}

/// How many boxes of one size fit on a pallet
pub fn pallet_fit(box_dims: &Dimensions, pallet: &Dimensions, system: UnitSystem) -> PalletFitResponse {
    PalletFitResponse {
        fit: calculate_pallet_fit(box_dims, pallet),
        unit_system: system,
    }
}

/// Full packing figures for one item, without saving a manifest line
pub fn line_metrics(
    quantity: f64,
    box_config: &BoxConfig,
    pallet: &Dimensions,
    system: UnitSystem,
) -> Result<LineMetricsResponse, String> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err("Quantity must be a non-negative number".to_string());
    }

    let pallet = PalletDefinition {
        id: "custom".to_string(),
        name: "Custom Pallet".to_string(),
        dimensions: *pallet,
    };
    let result = calculate_line_metrics(quantity, box_config, &pallet);

    Ok(LineMetricsResponse {
        unit_system: system,
        pallets_to_order: result.pallets_to_order(),
        weight_unit: system.weight_label(),
        volume_display: display_volume(result.total_volume, system),
        volume_display_unit: system.volume_label(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_length_goes_to_other_system() {
        let r = convert_length(12.0, UnitSystem::Imperial).unwrap();
        assert!((r.value - 304.8).abs() < 1e-9);
        assert_eq!(r.unit, "mm");
        assert_eq!(r.unit_system, UnitSystem::Metric);

        let back = convert_length(r.value, UnitSystem::Metric).unwrap();
        assert!((back.value - 12.0).abs() < 1e-9);
        assert_eq!(back.unit, "in");
    }

    #[test]
    fn test_convert_weight() {
        let r = convert_weight(1.0, UnitSystem::Imperial).unwrap();
        assert_eq!(r.value, 453.59237);
        assert_eq!(r.unit, "g");
        assert!(convert_weight(f64::NAN, UnitSystem::Metric).is_err());
    }

    #[test]
    fn test_convert_box_rounds_on_request() {
        let b = BoxConfig {
            items_per_box: 10,
            dimensions: Dimensions::new(760.0, 500.0, 380.0),
            gross_weight: 4500.0,
        };
        let raw = convert_box(&b, UnitSystem::Metric, UnitSystem::Imperial, false);
        assert!((raw.box_config.dimensions.length - 29.921259842519685).abs() < 1e-9);

        let rounded = convert_box(&b, UnitSystem::Metric, UnitSystem::Imperial, true);
        assert_eq!(rounded.box_config.dimensions, Dimensions::new(30.0, 20.0, 15.0));
        assert_eq!(rounded.box_config.items_per_box, 10);
        assert_eq!(rounded.length_unit, "in");
    }

    #[test]
    fn test_line_metrics_reports_order_count() {
        let b = BoxConfig {
            items_per_box: 20,
            dimensions: Dimensions::new(12.0, 10.0, 8.0),
            gross_weight: 15.5,
        };
        let r = line_metrics(6000.0, &b, &Dimensions::new(48.0, 40.0, 62.0), UnitSystem::Imperial).unwrap();
        assert_eq!(r.result.pallets_required, 2.68);
        assert_eq!(r.pallets_to_order, 3);
        assert_eq!(r.volume_display_unit, "ft³");
        assert!((r.volume_display - 300.0 * 960.0 / 1728.0).abs() < 1e-9);

        assert!(line_metrics(-1.0, &b, &Dimensions::new(48.0, 40.0, 62.0), UnitSystem::Imperial).is_err());
    }

    #[test]
    fn test_pallet_fit_passthrough() {
        let r = pallet_fit(
            &Dimensions::new(12.0, 10.0, 8.0),
            &Dimensions::new(48.0, 40.0, 62.0),
            UnitSystem::Imperial,
        );
        assert_eq!(r.fit.total_per_pallet, 112);
    }
}
