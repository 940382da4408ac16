//! Settings MCP Tools
//!
//! Active unit system and pallet.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Dimensions, PalletDefinition, Product, Settings, ShipmentLine, StoredPallet};
use crate::units::{format_dual_length, UnitSystem};
use super::manifest::{recalculate_lines, RecalculateOutcome};

/// Pallet extents formatted in both systems, imperial first
#[derive(Debug, Serialize)]
pub struct PalletDisplay {
    pub length: String,
    pub width: String,
    pub height: String,
}

impl PalletDisplay {
    fn new(pallet: &PalletDefinition, system: UnitSystem) -> Self {
        let d = &pallet.dimensions;
        Self {
            length: format_dual_length(d.length, system),
            width: format_dual_length(d.width, system),
            height: format_dual_length(d.height, system),
        }
    }
}

/// Response for get_settings and set_unit_system
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub unit_system: UnitSystem,
    /// Pallet as stored, with its own unit tag
    pub pallet: StoredPallet,
    /// Pallet in the active unit system
    pub active_pallet: PalletDefinition,
    pub pallet_display: PalletDisplay,
    pub catalog_version: u32,
    pub product_count: i64,
    pub line_count: i64,
}

/// Response for set_pallet
#[derive(Debug, Serialize)]
pub struct SetPalletResponse {
    pub success: bool,
    pub pallet: StoredPallet,
    pub recalculated: Option<RecalculateOutcome>,
}

/// Current settings
pub fn get_settings(db: &Database) -> Result<SettingsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let unit_system = Settings::unit_system(&conn).map_err(|e| format!("Database error: {}", e))?;
    let pallet = Settings::pallet(&conn).map_err(|e| format!("Database error: {}", e))?;
    let catalog_version = Settings::catalog_version(&conn).map_err(|e| format!("Database error: {}", e))?;
    let product_count = Product::count(&conn).map_err(|e| format!("Database error: {}", e))?;
    let line_count = ShipmentLine::count(&conn).map_err(|e| format!("Database error: {}", e))?;

    let active_pallet = pallet.in_system(unit_system);

    Ok(SettingsResponse {
        unit_system,
        pallet_display: PalletDisplay::new(&active_pallet, unit_system),
        active_pallet,
        pallet,
        catalog_version,
        product_count,
        line_count,
    })
}

/// Switch the active unit system; stored lines keep their own system
pub fn set_unit_system(db: &Database, system: UnitSystem) -> Result<SettingsResponse, String> {
    db.with_conn(|conn| Settings::set_unit_system(conn, system))
        .map_err(|e| format!("Failed to save unit system: {}", e))?;
    tracing::info!(%system, "Unit system changed");

    get_settings(db)
}

/// Store a new active pallet given in `system`
///
/// With `recalculate`, every manifest line is recomputed against it in the same
/// transaction.
pub fn set_pallet(
    db: &Database,
    dimensions: Dimensions,
    system: UnitSystem,
    name: Option<String>,
    recalculate: bool,
) -> Result<SetPalletResponse, String> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !(valid(dimensions.length) && valid(dimensions.width) && valid(dimensions.height)) {
        return Err("Pallet length, width, and height must all be greater than 0".to_string());
    }

    let mut pallet = PalletDefinition::gma_standard();
    pallet.dimensions = dimensions;
    if let Some(name) = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        pallet.name = name;
    }
    let stored = StoredPallet { unit_system: system, pallet };

    let recalculated = db
        .with_transaction(|tx| {
            Settings::set_pallet(tx, &stored)?;
            if recalculate {
                recalculate_lines(tx).map(Some)
            } else {
                Ok(None)
            }
        })
        .map_err(|e| format!("Failed to save pallet: {}", e))?;

    tracing::info!(
        length = dimensions.length,
        width = dimensions.width,
        height = dimensions.height,
        %system,
        "Pallet changed"
    );

    Ok(SetPalletResponse {
        success: true,
        pallet: stored,
        recalculated,
    })
}
