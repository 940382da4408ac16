//! Unit conversion module
//!
//! Handles the METRIC (mm/g) and IMPERIAL (in/lb) measurement systems.

pub mod converter;
pub mod system;

pub use converter::{
    convert_box_config, convert_dimensions, convert_length, convert_volume, convert_weight,
    display_volume, format_dual_length, round_dimensions,
};
pub use system::{
    Length, UnitSystem, Volume, Weight, GRAMS_PER_KG, GRAMS_PER_POUND, IN3_PER_FT3, MM3_PER_IN3,
    MM3_PER_M3, MM_PER_INCH,
};
