//! Pallet fit heuristic
//!
//! Single box type, axis-aligned, one layer pattern repeated vertically. Only
//! the two plan-view orientations are tried, so the result is a conservative
//! lower bound rather than an optimal packing.

use serde::{Deserialize, Serialize};

use crate::models::Dimensions;

/// How many boxes one pallet holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalletFit {
    pub boxes_per_layer: u64,
    pub layers: u64,
    pub total_per_pallet: u64,
}

/// `floor(space / extent)` as a count; negative and NaN ratios count as zero
fn whole_fits(space: f64, extent: f64) -> u64 {
    // `as` saturates: negatives and NaN become 0, huge ratios u64::MAX
    (space / extent).floor() as u64
}

/// Fit one box type onto a pallet
///
/// `box_dims` and `pallet` must be in the same unit system. `pallet.height` is the
/// maximum stack height. Box height never rotates.
pub fn calculate_pallet_fit(box_dims: &Dimensions, pallet: &Dimensions) -> PalletFit {
    if box_dims.is_degenerate() {
        tracing::debug!(?box_dims, "Degenerate box geometry, nothing fits");
        return PalletFit::default();
    }

    let straight = whole_fits(pallet.length, box_dims.length).saturating_mul(whole_fits(pallet.width, box_dims.width));
    let rotated = whole_fits(pallet.length, box_dims.width).saturating_mul(whole_fits(pallet.width, box_dims.length));
    let boxes_per_layer = straight.max(rotated);

    let layers = whole_fits(pallet.height, box_dims.height);

    PalletFit {
        boxes_per_layer,
        layers,
        total_per_pallet: boxes_per_layer.saturating_mul(layers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gma() -> Dimensions {
        Dimensions::new(48.0, 40.0, 62.0)
    }

    #[test]
    fn test_picks_better_orientation() {
        // straight: 4 x 4 = 16, rotated: 4 x 3 = 12
        let fit = calculate_pallet_fit(&Dimensions::new(12.0, 10.0, 8.0), &gma());
        assert_eq!(fit.boxes_per_layer, 16);
        assert_eq!(fit.layers, 7);
        assert_eq!(fit.total_per_pallet, 112);
    }

    #[test]
    fn test_rotation_wins_when_it_fits_more() {
        // straight: floor(48/10) * floor(40/16) = 4 * 2 = 8
        // rotated:  floor(48/16) * floor(40/10) = 3 * 4 = 12
        let fit = calculate_pallet_fit(&Dimensions::new(10.0, 16.0, 10.0), &gma());
        assert_eq!(fit.boxes_per_layer, 12);
    }

    #[test]
    fn test_is_symmetric_in_box_footprint() {
        let a = calculate_pallet_fit(&Dimensions::new(12.0, 10.0, 8.0), &gma());
        let b = calculate_pallet_fit(&Dimensions::new(10.0, 12.0, 8.0), &gma());
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_heuristic_is_a_lower_bound() {
        // 1920 / 165 leaves room for 11 by area, but no single orientation
        // grid reaches that. straight: 3 * 3 = 9, rotated: 4 * 2 = 8
        let fit = calculate_pallet_fit(&Dimensions::new(15.0, 11.0, 10.0), &gma());
        assert_eq!(fit.boxes_per_layer, 9);
    }

    #[test]
    fn test_degenerate_box_fits_nothing() {
        let zero = PalletFit::default();
        assert_eq!(calculate_pallet_fit(&Dimensions::new(0.0, 10.0, 8.0), &gma()), zero);
        assert_eq!(calculate_pallet_fit(&Dimensions::new(12.0, 0.0, 8.0), &gma()), zero);
        assert_eq!(calculate_pallet_fit(&Dimensions::new(12.0, 10.0, 0.0), &gma()), zero);
        assert_eq!(calculate_pallet_fit(&Dimensions::new(-12.0, 10.0, 8.0), &gma()), zero);
        assert_eq!(calculate_pallet_fit(&Dimensions::default(), &gma()), zero);
    }

    #[test]
    fn test_box_taller_than_stack_height() {
        let fit = calculate_pallet_fit(&Dimensions::new(12.0, 10.0, 70.0), &gma());
        assert_eq!(fit.boxes_per_layer, 16);
        assert_eq!(fit.layers, 0);
        assert_eq!(fit.total_per_pallet, 0);
    }

    #[test]
    fn test_degenerate_pallet_saturates_to_zero() {
        let fit = calculate_pallet_fit(&Dimensions::new(12.0, 10.0, 8.0), &Dimensions::new(-48.0, 40.0, 62.0));
        assert_eq!(fit.boxes_per_layer, 0);
        assert_eq!(fit.total_per_pallet, 0);
    }

    #[test]
    fn test_floor_is_exact_just_below_a_whole_fit() {
        // 47.99999999999 / 12 floors to 3: straight 3 x 4 = 12, rotated 4 x 3 = 12
        let pallet = Dimensions::new(47.99999999999, 40.0, 62.0);
        let fit = calculate_pallet_fit(&Dimensions::new(12.0, 10.0, 8.0), &pallet);
        assert_eq!(fit.boxes_per_layer, 12);
    }

    #[test]
    fn test_huge_ratios_saturate_instead_of_overflowing() {
        let fit = calculate_pallet_fit(
            &Dimensions::new(0.001, 0.001, 0.001),
            &Dimensions::new(1e6, 1e6, 1e6),
        );
        assert!(fit.boxes_per_layer > 0);
        assert!(fit.layers > 0);
        assert_eq!(fit.total_per_pallet, u64::MAX);
    }

    #[test]
    fn test_metric_pallet() {
        // LAC180 carton (315 x 415 x 315 mm) on a GMA pallet in mm
        let pallet = Dimensions::new(1219.2, 1016.0, 1574.8);
        let fit = calculate_pallet_fit(&Dimensions::new(315.0, 415.0, 315.0), &pallet);
        // straight: 3 * 2 = 6, rotated: 2 * 3 = 6
        assert_eq!(fit.boxes_per_layer, 6);
        assert_eq!(fit.layers, 4);
        assert_eq!(fit.total_per_pallet, 24);
    }
}
