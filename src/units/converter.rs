//! Unit conversion functions
//!
//! Scalar and composite conversions between METRIC and IMPERIAL. Nothing here
//! rounds; rounding for display is applied by callers after conversion.

use super::system::{
    UnitSystem, IN3_PER_FT3, GRAMS_PER_POUND, MM3_PER_IN3, MM3_PER_M3, MM_PER_INCH,
};
use crate::models::{BoxConfig, Dimensions};

/// Convert a bare length into `target`
///
/// The source is assumed to be the other system: inches when targeting METRIC,
/// millimeters when targeting IMPERIAL. Prefer [`super::Length::to`] when the
/// source system is known.
pub fn convert_length(value: f64, target: UnitSystem) -> f64 {
    match target {
        UnitSystem::Metric => value * MM_PER_INCH,
        UnitSystem::Imperial => value / MM_PER_INCH,
    }
}

/// Convert a bare weight into `target` (pounds <-> grams)
pub fn convert_weight(value: f64, target: UnitSystem) -> f64 {
    match target {
        UnitSystem::Metric => value * GRAMS_PER_POUND,
        UnitSystem::Imperial => value / GRAMS_PER_POUND,
    }
}

/// Convert a bare cubic volume into `target` (in³ <-> mm³)
pub fn convert_volume(value: f64, target: UnitSystem) -> f64 {
    match target {
        UnitSystem::Metric => value * MM3_PER_IN3,
        UnitSystem::Imperial => value / MM3_PER_IN3,
    }
}

/// Convert all three extents of a dimensions record
pub fn convert_dimensions(dims: &Dimensions, from: UnitSystem, to: UnitSystem) -> Dimensions {
    if from == to {
        return *dims;
    }
    Dimensions {
        length: convert_length(dims.length, to),
        width: convert_length(dims.width, to),
        height: convert_length(dims.height, to),
    }
}

/// Convert a master carton description between systems
///
/// `items_per_box` is dimensionless and passes through unchanged.
pub fn convert_box_config(box_config: &BoxConfig, from: UnitSystem, to: UnitSystem) -> BoxConfig {
    if from == to {
        return box_config.clone();
    }
    BoxConfig {
        items_per_box: box_config.items_per_box,
        dimensions: convert_dimensions(&box_config.dimensions, from, to),
        gross_weight: convert_weight(box_config.gross_weight, to),
    }
}

/// Round each extent to the nearest whole unit (display/form precision)
pub fn round_dimensions(dims: &Dimensions) -> Dimensions {
    Dimensions {
        length: dims.length.round(),
        width: dims.width.round(),
        height: dims.height.round(),
    }
}

/// Turn a raw cubic volume (mm³ or in³) into its display unit (m³ or ft³)
pub fn display_volume(volume: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => volume / MM3_PER_M3,
        UnitSystem::Imperial => volume / IN3_PER_FT3,
    }
}

/// Format a length in both systems, imperial first
///
/// - IMPERIAL 12 -> `12" (305 mm)`
/// - METRIC 305 -> `12" (305 mm)`
pub fn format_dual_length(value: f64, system: UnitSystem) -> String {
    match system {
        UnitSystem::Imperial => {
            let mm = convert_length(value, UnitSystem::Metric);
            format!("{}\" ({:.0} mm)", value, mm)
        }
        UnitSystem::Metric => {
            let inches = convert_length(value, UnitSystem::Imperial);
            format!("{:.0}\" ({} mm)", inches, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn test_length_factor_is_exact() {
        assert_eq!(convert_length(1.0, UnitSystem::Metric), 25.4);
        assert_eq!(convert_length(25.4, UnitSystem::Imperial), 1.0);
    }

    #[test]
    fn test_weight_factor_is_exact() {
        assert_eq!(convert_weight(1.0, UnitSystem::Metric), 453.59237);
        assert_eq!(convert_weight(453.59237, UnitSystem::Imperial), 1.0);
    }

    #[test]
    fn test_length_round_trip() {
        for v in [0.001, 1.0, 12.0, 48.0, 62.0, 415.0, 1234.5678, 1.0e6] {
            let back = convert_length(convert_length(v, UnitSystem::Imperial), UnitSystem::Metric);
            assert!(rel_err(back, v) < 1e-12, "length {} came back as {}", v, back);

            let back = convert_length(convert_length(v, UnitSystem::Metric), UnitSystem::Imperial);
            assert!(rel_err(back, v) < 1e-12, "length {} came back as {}", v, back);
        }
    }

    #[test]
    fn test_weight_round_trip_grams() {
        for grams in [0.5, 11850.0, 6025.0, 13200.0, 17000.0, 4500.0] {
            let lb = convert_weight(grams, UnitSystem::Imperial);
            let back = convert_weight(lb, UnitSystem::Metric);
            assert!(rel_err(back, grams) < 1e-6);
        }
    }

    #[test]
    fn test_weight_round_trip_pounds() {
        for lb in [0.25, 15.5, 33.0, 387.5] {
            let g = convert_weight(lb, UnitSystem::Metric);
            let back = convert_weight(g, UnitSystem::Imperial);
            assert!(rel_err(back, lb) < 1e-6);
        }
    }

    #[test]
    fn test_zero_and_negative_pass_through() {
        assert_eq!(convert_length(0.0, UnitSystem::Metric), 0.0);
        assert_eq!(convert_length(-2.0, UnitSystem::Metric), -50.8);
        assert_eq!(convert_weight(-1.0, UnitSystem::Metric), -453.59237);
    }

    #[test]
    fn test_convert_box_config_identity() {
        let b = BoxConfig {
            items_per_box: 500,
            dimensions: Dimensions::new(315.0, 415.0, 315.0),
            gross_weight: 11850.0,
        };
        assert_eq!(convert_box_config(&b, UnitSystem::Metric, UnitSystem::Metric), b);
        assert_eq!(convert_box_config(&b, UnitSystem::Imperial, UnitSystem::Imperial), b);
    }

    #[test]
    fn test_convert_box_config_to_metric() {
        let b = BoxConfig {
            items_per_box: 20,
            dimensions: Dimensions::new(12.0, 10.0, 8.0),
            gross_weight: 15.5,
        };
        let m = convert_box_config(&b, UnitSystem::Imperial, UnitSystem::Metric);
        assert_eq!(m.items_per_box, 20);
        assert!((m.dimensions.length - 304.8).abs() < 1e-9);
        assert!((m.dimensions.width - 254.0).abs() < 1e-9);
        assert!((m.dimensions.height - 203.2).abs() < 1e-9);
        assert!((m.gross_weight - 7030.681735).abs() < 1e-6);

        let back = convert_box_config(&m, UnitSystem::Metric, UnitSystem::Imperial);
        assert!((back.dimensions.length - 12.0).abs() < 1e-9);
        assert!(rel_err(back.gross_weight, 15.5) < 1e-9);
    }

    #[test]
    fn test_round_dimensions() {
        let d = round_dimensions(&Dimensions::new(12.40, 16.34, 12.5));
        assert_eq!(d, Dimensions::new(12.0, 16.0, 13.0));
    }

    #[test]
    fn test_display_volume() {
        assert!((display_volume(1.0e9, UnitSystem::Metric) - 1.0).abs() < 1e-12);
        assert!((display_volume(1728.0, UnitSystem::Imperial) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_dual_length() {
        assert_eq!(format_dual_length(12.0, UnitSystem::Imperial), "12\" (305 mm)");
        assert_eq!(format_dual_length(305.0, UnitSystem::Metric), "12\" (305 mm)");
    }
}
