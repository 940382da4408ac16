//! Packing calculation module
//!
//! Pure, deterministic box and pallet math over matched-unit inputs.

pub mod fit;
pub mod metrics;
pub mod summary;

pub use fit::{calculate_pallet_fit, PalletFit};
pub use metrics::{calculate_line_metrics, round2};
pub use summary::{summarize, ManifestSummary};
