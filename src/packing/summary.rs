//! Manifest totals
//!
//! Reduces many lines, possibly entered in different unit systems, to one set of
//! totals in a single display system.

use serde::Serialize;

use super::metrics::round2;
use crate::models::ShipmentLine;
use crate::units::{display_volume, UnitSystem, Weight};

/// Grand totals for a manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSummary {
    pub unit_system: UnitSystem,
    pub line_count: usize,
    pub total_items: f64,
    pub total_boxes: u64,
    /// Sum of per-line fractional pallet requirements
    pub total_pallets: f64,
    /// `total_pallets` rounded up to whole pallets
    pub pallets_to_order: u64,
    /// g or lb
    pub total_gross_weight: f64,
    /// mm³ or in³
    pub total_volume: f64,
    pub weight_lb: f64,
    pub weight_kg: f64,
    /// m³ or ft³
    pub volume_display: f64,
    pub volume_display_unit: &'static str,
}

/// Sum every line into `display` units
pub fn summarize(lines: &[ShipmentLine], display: UnitSystem) -> ManifestSummary {
    let mut total_items = 0.0;
    let mut total_boxes = 0u64;
    let mut total_pallets = 0.0;
    let mut total_gross_weight = 0.0;
    let mut total_volume = 0.0;

    for line in lines {
        let result = line.result.convert(line.unit_system, display);
        total_items += line.item.quantity;
        total_boxes = total_boxes.saturating_add(result.total_boxes);
        total_pallets += result.pallets_required;
        total_gross_weight += result.total_gross_weight;
        total_volume += result.total_volume;
    }

    // Per-line values are already 2-decimal; keep float noise out of the sum
    let total_pallets = round2(total_pallets);
    let weight = Weight::new(total_gross_weight, display);

    ManifestSummary {
        unit_system: display,
        line_count: lines.len(),
        total_items,
        total_boxes,
        total_pallets,
        pallets_to_order: total_pallets.ceil().max(0.0) as u64,
        total_gross_weight,
        total_volume,
        weight_lb: weight.as_lb(),
        weight_kg: weight.as_kg(),
        volume_display: display_volume(total_volume, display),
        volume_display_unit: display.volume_label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoxConfig, CalculationResult, Dimensions, ItemInput};

    fn line(system: UnitSystem, quantity: f64, result: CalculationResult) -> ShipmentLine {
        ShipmentLine {
            id: 1,
            item: ItemInput { name: "x".into(), quantity },
            unit_system: system,
            box_config: BoxConfig {
                items_per_box: 1,
                dimensions: Dimensions::new(1.0, 1.0, 1.0),
                gross_weight: 1.0,
            },
            result,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_empty_manifest() {
        let s = summarize(&[], UnitSystem::Imperial);
        assert_eq!(s.line_count, 0);
        assert_eq!(s.total_boxes, 0);
        assert_eq!(s.pallets_to_order, 0);
        assert_eq!(s.volume_display_unit, "ft³");
    }

    #[test]
    fn test_sums_lines_in_one_system() {
        let a = CalculationResult {
            total_boxes: 25,
            total_gross_weight: 387.5,
            total_volume: 24000.0,
            pallets_required: 0.22,
            boxes_per_pallet: 112,
            boxes_per_layer: 16,
            pallet_layers: 7,
        };
        let b = CalculationResult {
            total_boxes: 300,
            total_gross_weight: 4650.0,
            total_volume: 288000.0,
            pallets_required: 2.68,
            ..a.clone()
        };
        let s = summarize(
            &[line(UnitSystem::Imperial, 500.0, a), line(UnitSystem::Imperial, 6000.0, b)],
            UnitSystem::Imperial,
        );

        assert_eq!(s.line_count, 2);
        assert_eq!(s.total_items, 6500.0);
        assert_eq!(s.total_boxes, 325);
        assert_eq!(s.total_pallets, 2.9);
        assert_eq!(s.pallets_to_order, 3);
        assert_eq!(s.total_gross_weight, 5037.5);
        assert!((s.weight_kg - 5037.5 * 0.45359237).abs() < 1e-9);
        assert!((s.volume_display - 312000.0 / 1728.0).abs() < 1e-9);
    }

    #[test]
    fn test_converts_mixed_systems_before_summing() {
        let imperial = CalculationResult {
            total_boxes: 1,
            total_gross_weight: 1.0, // lb
            total_volume: 1.0,       // in³
            pallets_required: 0.5,
            boxes_per_pallet: 2,
            ..Default::default()
        };
        let metric = CalculationResult {
            total_boxes: 1,
            total_gross_weight: 1000.0, // g
            total_volume: 1.0e9,        // mm³
            pallets_required: 0.5,
            boxes_per_pallet: 2,
            ..Default::default()
        };
        let lines = [
            line(UnitSystem::Imperial, 1.0, imperial),
            line(UnitSystem::Metric, 1.0, metric),
        ];

        let s = summarize(&lines, UnitSystem::Metric);
        assert!((s.total_gross_weight - (453.59237 + 1000.0)).abs() < 1e-9);
        assert!((s.weight_kg - 1.45359237).abs() < 1e-9);
        assert!((s.total_volume - (16387.064 + 1.0e9)).abs() < 1e-3);
        assert_eq!(s.total_pallets, 1.0);
        assert_eq!(s.pallets_to_order, 1);
        assert_eq!(s.volume_display_unit, "m³");
    }

    #[test]
    fn test_total_boxes_saturate_on_huge_lines() {
        let huge = CalculationResult {
            total_boxes: u64::MAX,
            boxes_per_pallet: 1,
            ..Default::default()
        };
        let lines = [
            line(UnitSystem::Metric, 1.0, huge.clone()),
            line(UnitSystem::Metric, 1.0, huge),
        ];

        let s = summarize(&lines, UnitSystem::Metric);
        assert_eq!(s.total_boxes, u64::MAX);
    }
}
