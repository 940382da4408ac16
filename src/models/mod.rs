//! Data models
//!
//! Value records for the calculator and the persisted catalog/manifest entities.

mod calculation;
mod dimensions;
mod product;
mod settings;
mod shipment_line;

pub use calculation::CalculationResult;
pub use dimensions::{BoxConfig, Dimensions, ItemInput, PalletDefinition};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use settings::{Settings, StoredPallet};
pub use shipment_line::{ShipmentLine, ShipmentLineCreate};
