//! Geometry value records
//!
//! Box and pallet extents. None of these carry a unit tag themselves; the
//! owning record (product, line, pallet setting) stores the `UnitSystem`.

use serde::{Deserialize, Serialize};

use crate::units::{convert_box_config, convert_dimensions, UnitSystem};

/// Axis-aligned extents, all three in the same unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self { length, width, height }
    }

    /// Geometric volume in cubic units of the input length unit
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// True when any extent is zero, negative, or NaN
    pub fn is_degenerate(&self) -> bool {
        !(self.length > 0.0 && self.width > 0.0 && self.height > 0.0)
    }

    pub fn convert(&self, from: UnitSystem, to: UnitSystem) -> Self {
        convert_dimensions(self, from, to)
    }
}

/// One master carton type
///
/// `gross_weight` is the weight of a fully packed carton, not a per-item weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    pub items_per_box: u32,
    pub dimensions: Dimensions,
    pub gross_weight: f64,
}

impl BoxConfig {
    pub fn convert(&self, from: UnitSystem, to: UnitSystem) -> Self {
        convert_box_config(self, from, to)
    }
}

/// A pallet footprint and its maximum stack height
///
/// `dimensions.height` is the allowed load height, not the pallet deck's own height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletDefinition {
    pub id: String,
    pub name: String,
    pub dimensions: Dimensions,
}

impl PalletDefinition {
    /// GMA standard pallet: 48 x 40 in, 62 in maximum load height
    pub fn gma_standard() -> Self {
        Self {
            id: "custom".to_string(),
            name: "Custom Pallet".to_string(),
            dimensions: Dimensions::new(48.0, 40.0, 62.0),
        }
    }

    pub fn converted(&self, from: UnitSystem, to: UnitSystem) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            dimensions: self.dimensions.convert(from, to),
        }
    }
}

/// A manifest item: what is shipped and how many
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume() {
        assert_eq!(Dimensions::new(12.0, 10.0, 8.0).volume(), 960.0);
    }

    #[test]
    fn test_is_degenerate() {
        assert!(!Dimensions::new(1.0, 1.0, 1.0).is_degenerate());
        assert!(Dimensions::new(0.0, 1.0, 1.0).is_degenerate());
        assert!(Dimensions::new(1.0, -1.0, 1.0).is_degenerate());
        assert!(Dimensions::new(1.0, 1.0, f64::NAN).is_degenerate());
        assert!(Dimensions::default().is_degenerate());
    }

    #[test]
    fn test_pallet_converted_keeps_identity_fields() {
        let p = PalletDefinition::gma_standard();
        let m = p.converted(UnitSystem::Imperial, UnitSystem::Metric);
        assert_eq!(m.id, "custom");
        assert!((m.dimensions.length - 1219.2).abs() < 1e-9);
        assert!((m.dimensions.width - 1016.0).abs() < 1e-9);
        assert!((m.dimensions.height - 1574.8).abs() < 1e-9);
    }
}
