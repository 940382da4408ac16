//! Shared calculation result structure
//!
//! Cached on shipment lines; always recomputable from quantity, box, and pallet.

use serde::{Deserialize, Serialize};

use crate::units::{convert_volume, convert_weight, UnitSystem};

/// Derived packing figures for one manifest line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_boxes: u64,
    pub total_gross_weight: f64, // g or lb
    pub total_volume: f64,       // mm³ or in³
    pub pallets_required: f64,   // fractional, 2 decimals
    pub boxes_per_pallet: u64,
    pub boxes_per_layer: u64,
    pub pallet_layers: u64,
}

impl CalculationResult {
    /// Express weight and volume in another system; counts are unitless
    pub fn convert(&self, from: UnitSystem, to: UnitSystem) -> Self {
        if from == to {
            return self.clone();
        }
        Self {
            total_gross_weight: convert_weight(self.total_gross_weight, to),
            total_volume: convert_volume(self.total_volume, to),
            ..self.clone()
        }
    }

    /// Whole pallets to order for this line alone
    pub fn pallets_to_order(&self) -> u64 {
        self.pallets_required.ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_leaves_counts_alone() {
        let r = CalculationResult {
            total_boxes: 25,
            total_gross_weight: 387.5,
            total_volume: 24000.0,
            pallets_required: 0.22,
            boxes_per_pallet: 112,
            boxes_per_layer: 16,
            pallet_layers: 7,
        };
        let m = r.convert(UnitSystem::Imperial, UnitSystem::Metric);
        assert_eq!(m.total_boxes, 25);
        assert_eq!(m.boxes_per_pallet, 112);
        assert_eq!(m.pallets_required, 0.22);
        assert!((m.total_gross_weight - 175767.043375).abs() < 1e-6);
        assert!((m.total_volume - 24000.0 * 16387.064).abs() < 1e-3);
    }

    #[test]
    fn test_pallets_to_order() {
        let mut r = CalculationResult::default();
        r.pallets_required = 2.35;
        assert_eq!(r.pallets_to_order(), 3);
        r.pallets_required = 2.0;
        assert_eq!(r.pallets_to_order(), 2);
        r.pallets_required = 0.0;
        assert_eq!(r.pallets_to_order(), 0);
    }
}
