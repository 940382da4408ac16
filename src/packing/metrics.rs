//! Line metrics
//!
//! Box count, weight, volume, and pallet requirement for one manifest line.

use crate::models::{BoxConfig, CalculationResult, PalletDefinition};
use super::fit::calculate_pallet_fit;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the packing figures for `quantity` items
///
/// `box_config` and `pallet` must share a unit system; the weight and volume
/// come back in that system. Bad geometry never fails: a zero fit is replaced by
/// one box per pallet so `pallets_required` stays finite and equals `total_boxes`.
/// `pallets_required` is a fraction; ceiling to whole pallets is left to callers.
pub fn calculate_line_metrics(
    quantity: f64,
    box_config: &BoxConfig,
    pallet: &PalletDefinition,
) -> CalculationResult {
    let items_per_box = box_config.items_per_box.max(1) as f64;
    let total_boxes = (quantity / items_per_box).ceil().max(0.0) as u64;

    let total_gross_weight = total_boxes as f64 * box_config.gross_weight;
    let total_volume = total_boxes as f64 * box_config.dimensions.volume();

    let fit = calculate_pallet_fit(&box_config.dimensions, &pallet.dimensions);
    let boxes_per_pallet = if fit.total_per_pallet == 0 {
        1
    } else {
        fit.total_per_pallet
    };
    let pallets_required = round2(total_boxes as f64 / boxes_per_pallet as f64);

    CalculationResult {
        total_boxes,
        total_gross_weight,
        total_volume,
        pallets_required,
        boxes_per_pallet,
        boxes_per_layer: fit.boxes_per_layer,
        pallet_layers: fit.layers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimensions;
    use crate::units::UnitSystem;

    fn gma() -> PalletDefinition {
        PalletDefinition::gma_standard()
    }

    fn widget_box() -> BoxConfig {
        BoxConfig {
            items_per_box: 20,
            dimensions: Dimensions::new(12.0, 10.0, 8.0),
            gross_weight: 15.5,
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let r = calculate_line_metrics(500.0, &widget_box(), &gma());
        assert_eq!(r.total_boxes, 25);
        assert_eq!(r.total_gross_weight, 387.5);
        assert_eq!(r.total_volume, 25.0 * 960.0);
        assert_eq!(r.boxes_per_layer, 16);
        assert_eq!(r.pallet_layers, 7);
        assert_eq!(r.boxes_per_pallet, 112);
        assert_eq!(r.pallets_required, 0.22);
    }

    #[test]
    fn test_partial_box_rounds_up() {
        let mut b = widget_box();
        b.items_per_box = 10;
        assert_eq!(calculate_line_metrics(101.0, &b, &gma()).total_boxes, 11);
        assert_eq!(calculate_line_metrics(100.0, &b, &gma()).total_boxes, 10);
        assert_eq!(calculate_line_metrics(1.0, &b, &gma()).total_boxes, 1);
        assert_eq!(calculate_line_metrics(0.0, &b, &gma()).total_boxes, 0);
    }

    #[test]
    fn test_degenerate_box_uses_one_box_per_pallet() {
        let b = BoxConfig {
            items_per_box: 100,
            dimensions: Dimensions::new(0.0, 0.0, 0.0),
            gross_weight: 0.0,
        };
        let r = calculate_line_metrics(1050.0, &b, &gma());
        assert_eq!(r.total_boxes, 11);
        assert_eq!(r.boxes_per_layer, 0);
        assert_eq!(r.pallet_layers, 0);
        assert_eq!(r.boxes_per_pallet, 1);
        assert_eq!(r.pallets_required, 11.0);
        assert_eq!(r.total_volume, 0.0);
    }

    #[test]
    fn test_pallets_required_keeps_fraction() {
        // 300 boxes at 112 per pallet = 2.678... -> 2.68, never ceiled here
        let r = calculate_line_metrics(6000.0, &widget_box(), &gma());
        assert_eq!(r.total_boxes, 300);
        assert_eq!(r.pallets_required, 2.68);
        assert_eq!(r.pallets_to_order(), 3);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.678571), 2.68);
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(-1.234), -1.23);
    }

    #[test]
    fn test_is_deterministic() {
        let a = calculate_line_metrics(777.0, &widget_box(), &gma());
        let b = calculate_line_metrics(777.0, &widget_box(), &gma());
        assert_eq!(a, b);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let b = widget_box();
        let p = gma();
        calculate_line_metrics(500.0, &b, &p);
        assert_eq!(b, widget_box());
        assert_eq!(p, gma());
    }

    #[test]
    fn test_zero_items_per_box_is_treated_as_one() {
        let mut b = widget_box();
        b.items_per_box = 0;
        assert_eq!(calculate_line_metrics(7.0, &b, &gma()).total_boxes, 7);
    }

    #[test]
    fn test_same_answer_in_either_system() {
        // Counts depend only on ratios, so converting both inputs together keeps them
        let b = widget_box();
        let p = gma();
        let imperial = calculate_line_metrics(500.0, &b, &p);

        let bm = b.convert(UnitSystem::Imperial, UnitSystem::Metric);
        let pm = p.converted(UnitSystem::Imperial, UnitSystem::Metric);
        let metric = calculate_line_metrics(500.0, &bm, &pm);

        assert_eq!(metric.total_boxes, imperial.total_boxes);
        assert_eq!(metric.boxes_per_pallet, imperial.boxes_per_pallet);
        assert_eq!(metric.pallets_required, imperial.pallets_required);
        assert!((metric.total_gross_weight - 387.5 * 453.59237).abs() < 1e-6);
    }
}
