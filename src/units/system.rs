//! Unit systems and conversion constants
//!
//! Provides the two supported measurement systems, the unit-tagged scalar types
//! stored at rest, and the standard conversion factors between them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Millimeters per inch (exact by definition)
pub const MM_PER_INCH: f64 = 25.4;
/// Grams per avoirdupois pound (exact by definition)
pub const GRAMS_PER_POUND: f64 = 453.59237;
/// Cubic millimeters per cubic inch
pub const MM3_PER_IN3: f64 = MM_PER_INCH * MM_PER_INCH * MM_PER_INCH;
/// Cubic millimeters per cubic meter
pub const MM3_PER_M3: f64 = 1.0e9;
/// Cubic inches per cubic foot
pub const IN3_PER_FT3: f64 = 1728.0;
/// Grams per kilogram
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Measurement system for lengths and weights
///
/// METRIC measures length in millimeters and weight in grams.
/// IMPERIAL measures length in inches and weight in pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitSystem {
    Metric,
    #[default]
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "METRIC",
            UnitSystem::Imperial => "IMPERIAL",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "mm" | "si" => Some(UnitSystem::Metric),
            "imperial" | "in" | "us" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }

    /// The system a bare value is assumed to be in when converting into `self`
    pub fn other(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn length_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "mm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn weight_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "g",
            UnitSystem::Imperial => "lb",
        }
    }

    /// Label of the display volume unit (see `display_volume`)
    pub fn volume_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m³",
            UnitSystem::Imperial => "ft³",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tagged Values
// ============================================================================

/// A length that always knows which system it is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub system: UnitSystem,
}

/// A weight that always knows which system it is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub system: UnitSystem,
}

/// A geometric volume in cubic length units of its system (mm³ or in³)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub value: f64,
    pub system: UnitSystem,
}

impl Length {
    pub fn new(value: f64, system: UnitSystem) -> Self {
        Self { value, system }
    }

    pub fn mm(value: f64) -> Self {
        Self::new(value, UnitSystem::Metric)
    }

    pub fn inches(value: f64) -> Self {
        Self::new(value, UnitSystem::Imperial)
    }

    /// Express this length in `target`. Same-system conversion is the identity.
    pub fn to(self, target: UnitSystem) -> Self {
        if self.system == target {
            return self;
        }
        Self::new(super::converter::convert_length(self.value, target), target)
    }
}

impl Weight {
    pub fn new(value: f64, system: UnitSystem) -> Self {
        Self { value, system }
    }

    pub fn grams(value: f64) -> Self {
        Self::new(value, UnitSystem::Metric)
    }

    pub fn pounds(value: f64) -> Self {
        Self::new(value, UnitSystem::Imperial)
    }

    pub fn to(self, target: UnitSystem) -> Self {
        if self.system == target {
            return self;
        }
        Self::new(super::converter::convert_weight(self.value, target), target)
    }

    pub fn as_kg(self) -> f64 {
        self.to(UnitSystem::Metric).value / GRAMS_PER_KG
    }

    pub fn as_lb(self) -> f64 {
        self.to(UnitSystem::Imperial).value
    }
}

impl Volume {
    pub fn new(value: f64, system: UnitSystem) -> Self {
        Self { value, system }
    }

    pub fn to(self, target: UnitSystem) -> Self {
        if self.system == target {
            return self;
        }
        Self::new(super::converter::convert_volume(self.value, target), target)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.system.length_label())
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.system.weight_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_system_from_str() {
        assert_eq!(UnitSystem::from_str("METRIC"), Some(UnitSystem::Metric));
        assert_eq!(UnitSystem::from_str("imperial"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_str(" Metric "), Some(UnitSystem::Metric));
        assert_eq!(UnitSystem::from_str("furlongs"), None);
    }

    #[test]
    fn test_unit_system_serde_uppercase() {
        let json = serde_json::to_string(&UnitSystem::Metric).unwrap();
        assert_eq!(json, "\"METRIC\"");
        let parsed: UnitSystem = serde_json::from_str("\"IMPERIAL\"").unwrap();
        assert_eq!(parsed, UnitSystem::Imperial);
    }

    #[test]
    fn test_labels() {
        assert_eq!(UnitSystem::Metric.length_label(), "mm");
        assert_eq!(UnitSystem::Imperial.weight_label(), "lb");
        assert_eq!(UnitSystem::Imperial.volume_label(), "ft³");
        assert_eq!(UnitSystem::Metric.other(), UnitSystem::Imperial);
    }

    #[test]
    fn test_tagged_length_same_system_is_identity() {
        let l = Length::mm(305.0);
        assert_eq!(l.to(UnitSystem::Metric), l);
    }

    #[test]
    fn test_tagged_length_converts_from_its_own_tag() {
        let l = Length::inches(12.0).to(UnitSystem::Metric);
        assert_eq!(l.system, UnitSystem::Metric);
        assert!((l.value - 304.8).abs() < 1e-9);

        let back = l.to(UnitSystem::Imperial);
        assert!((back.value - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_kg_and_lb() {
        let w = Weight::pounds(10.0);
        assert!((w.as_kg() - 4.5359237).abs() < 1e-9);
        assert!((w.as_lb() - 10.0).abs() < 1e-12);

        let g = Weight::grams(1000.0);
        assert!((g.as_kg() - 1.0).abs() < 1e-12);
        assert!((g.as_lb() - 2.20462262).abs() < 1e-6);
    }

    #[test]
    fn test_volume_conversion() {
        let v = Volume::new(1.0, UnitSystem::Imperial).to(UnitSystem::Metric);
        assert!((v.value - 16387.064).abs() < 1e-6);
    }
}
