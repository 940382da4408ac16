//! Manifest MCP Tools
//!
//! Tools for building a shipment manifest: adding lines from the catalog or
//! explicit cartons, bulk import, recalculation against the active pallet, and
//! totals.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{
    BoxConfig, ItemInput, Product, Settings, ShipmentLine, ShipmentLineCreate, StoredPallet,
};
use crate::packing::{calculate_line_metrics, round2, summarize, ManifestSummary};
use crate::units::{round_dimensions, UnitSystem};
use super::import::{self, TemplateResponse, MANIFEST_HEADER};

/// A new manifest line
///
/// Either `product_id` names a catalog product, or `box_config` describes the
/// carton in `unit_system`. With neither, `name` is looked up in the catalog.
#[derive(Debug, Clone, Default)]
pub struct LineInput {
    pub name: Option<String>,
    pub quantity: f64,
    pub product_id: Option<String>,
    pub box_config: Option<BoxConfig>,
    /// Defaults to the active unit system
    pub unit_system: Option<UnitSystem>,
}

/// Response for add_line
#[derive(Debug, Serialize)]
pub struct AddLineResponse {
    pub line: ShipmentLine,
    pub pallets_to_order: u64,
}

/// Response for list_lines
#[derive(Debug, Serialize)]
pub struct ManifestResponse {
    pub lines: Vec<ShipmentLine>,
    pub summary: ManifestSummary,
}

/// Response for remove_line
#[derive(Debug, Serialize)]
pub struct RemoveLineResponse {
    pub success: bool,
    pub removed_id: i64,
}

/// Response for clear_manifest
#[derive(Debug, Serialize)]
pub struct ClearManifestResponse {
    pub success: bool,
    pub removed: usize,
}

/// Outcome of recomputing every line against the stored pallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalculateOutcome {
    pub lines: usize,
    pub changed: usize,
    pub pallets_before: f64,
    pub pallets_after: f64,
}

/// Response for recalculate_manifest
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    #[serde(flatten)]
    pub outcome: RecalculateOutcome,
    pub pallet: StoredPallet,
    pub summary: ManifestSummary,
}

/// Response for paste_manifest
#[derive(Debug, Serialize)]
pub struct PasteManifestResponse {
    pub success: bool,
    pub added: usize,
    pub not_found: Vec<String>,
    pub invalid_rows: Vec<String>,
    pub message: String,
}

/// Response for import_manifest_csv
#[derive(Debug, Serialize)]
pub struct ImportManifestResponse {
    pub success: bool,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub message: String,
}

/// Catalog carton expressed in `system`, extents rounded to whole units
fn product_box(product: &Product, system: UnitSystem) -> BoxConfig {
    let mut b = product.box_config.convert(UnitSystem::Metric, system);
    b.dimensions = round_dimensions(&b.dimensions);
    b
}

/// Calculate and insert one line against the stored pallet
fn insert_line(
    conn: &Connection,
    pallet: &StoredPallet,
    name: &str,
    quantity: f64,
    system: UnitSystem,
    box_config: BoxConfig,
) -> DbResult<ShipmentLine> {
    let result = calculate_line_metrics(quantity, &box_config, &pallet.in_system(system));
    if result.boxes_per_layer == 0 || result.pallet_layers == 0 {
        tracing::warn!(name, %system, "Carton does not fit the pallet; counting one box per pallet");
    }

    ShipmentLine::create(
        conn,
        &ShipmentLineCreate {
            item: ItemInput { name: name.to_string(), quantity },
            unit_system: system,
            box_config,
            result,
        },
    )
}

fn active_system(conn: &Connection, requested: Option<UnitSystem>) -> DbResult<UnitSystem> {
    match requested {
        Some(system) => Ok(system),
        None => Settings::unit_system(conn),
    }
}

/// Recompute every stored line against the stored pallet
///
/// Each line keeps its own unit system; the pallet is converted into it.
pub fn recalculate_lines(conn: &Connection) -> DbResult<RecalculateOutcome> {
    let pallet = Settings::pallet(conn)?;
    let lines = ShipmentLine::list(conn)?;

    let mut outcome = RecalculateOutcome {
        lines: lines.len(),
        changed: 0,
        pallets_before: 0.0,
        pallets_after: 0.0,
    };

    for line in &lines {
        let result = calculate_line_metrics(
            line.item.quantity,
            &line.box_config,
            &pallet.in_system(line.unit_system),
        );
        outcome.pallets_before += line.result.pallets_required;
        outcome.pallets_after += result.pallets_required;

        if result != line.result {
            ShipmentLine::update_result(conn, line.id, &result)?;
            outcome.changed += 1;
        }
    }

    outcome.pallets_before = round2(outcome.pallets_before);
    outcome.pallets_after = round2(outcome.pallets_after);
    Ok(outcome)
}

/// Add a line to the manifest
pub fn add_line(db: &Database, input: LineInput) -> Result<AddLineResponse, String> {
    if !input.quantity.is_finite() || input.quantity <= 0.0 {
        return Err("Quantity must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let system = active_system(&conn, input.unit_system).map_err(|e| format!("Database error: {}", e))?;

    let product = match (&input.product_id, &input.box_config, &input.name) {
        (Some(id), _, _) => Some(
            Product::get_by_id(&conn, id)
                .map_err(|e| format!("Database error: {}", e))?
                .ok_or_else(|| format!("Product not found: {}", id))?,
        ),
        (None, None, Some(name)) => Some(
            Product::find_by_name(&conn, name)
                .map_err(|e| format!("Database error: {}", e))?
                .ok_or_else(|| format!("No box given and no catalog product named '{}'", name.trim()))?,
        ),
        _ => None,
    };

    let (name, box_config) = match (product, input.box_config) {
        (Some(product), _) => (
            input.name.clone().filter(|n| !n.trim().is_empty()).unwrap_or_else(|| product.name.clone()),
            product_box(&product, system),
        ),
        (None, Some(b)) => (input.name.clone().unwrap_or_default(), b),
        (None, None) => return Err("Provide product_id, box_config, or a catalog product name".to_string()),
    };

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Item name is required".to_string());
    }

    let pallet = Settings::pallet(&conn).map_err(|e| format!("Database error: {}", e))?;
    let line = insert_line(&conn, &pallet, &name, input.quantity, system, box_config)
        .map_err(|e| format!("Failed to add line: {}", e))?;

    Ok(AddLineResponse {
        pallets_to_order: line.result.pallets_to_order(),
        line,
    })
}

/// List all lines with totals in `display` (or the active system)
pub fn list_lines(db: &Database, display: Option<UnitSystem>) -> Result<ManifestResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let system = active_system(&conn, display).map_err(|e| format!("Database error: {}", e))?;
    let lines = ShipmentLine::list(&conn).map_err(|e| format!("Database error: {}", e))?;
    let summary = summarize(&lines, system);

    Ok(ManifestResponse { lines, summary })
}

/// Remove one line
pub fn remove_line(db: &Database, id: i64) -> Result<RemoveLineResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = ShipmentLine::delete(&conn, id).map_err(|e| format!("Database error: {}", e))?;
    if !deleted {
        return Err(format!("Line not found: {}", id));
    }

    Ok(RemoveLineResponse { success: true, removed_id: id })
}

/// Remove every line
pub fn clear_manifest(db: &Database) -> Result<ClearManifestResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = ShipmentLine::delete_all(&conn).map_err(|e| format!("Database error: {}", e))?;
    tracing::info!(removed, "Cleared manifest");

    Ok(ClearManifestResponse { success: true, removed })
}

/// Recompute every line after a pallet change
pub fn recalculate_manifest(db: &Database) -> Result<RecalculateResponse, String> {
    let outcome = db
        .with_transaction(|tx| recalculate_lines(tx))
        .map_err(|e| format!("Failed to recalculate manifest: {}", e))?;

    tracing::info!(
        lines = outcome.lines,
        changed = outcome.changed,
        pallets_before = outcome.pallets_before,
        pallets_after = outcome.pallets_after,
        "Recalculated manifest"
    );

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let pallet = Settings::pallet(&conn).map_err(|e| format!("Database error: {}", e))?;
    let system = Settings::unit_system(&conn).map_err(|e| format!("Database error: {}", e))?;
    let lines = ShipmentLine::list(&conn).map_err(|e| format!("Database error: {}", e))?;

    Ok(RecalculateResponse {
        outcome,
        pallet,
        summary: summarize(&lines, system),
    })
}

/// Add lines from pasted `name<TAB>quantity` rows, matching names against the catalog
pub fn paste_manifest(db: &Database, text: &str, system: Option<UnitSystem>) -> Result<PasteManifestResponse, String> {
    let parsed = import::parse_paste(text);

    let (added, not_found) = db
        .with_transaction(|tx| {
            let system = active_system(tx, system)?;
            let pallet = Settings::pallet(tx)?;
            let mut added = 0;
            let mut not_found = Vec::new();

            for row in &parsed.rows {
                match Product::find_by_name(tx, &row.name)? {
                    Some(product) => {
                        let box_config = product_box(&product, system);
                        insert_line(tx, &pallet, &product.name, row.quantity, system, box_config)?;
                        added += 1;
                    }
                    None => not_found.push(row.name.clone()),
                }
            }
            Ok((added, not_found))
        })
        .map_err(|e| format!("Failed to add pasted lines: {}", e))?;

    if !not_found.is_empty() {
        tracing::warn!(count = not_found.len(), "Pasted products not in catalog");
    }
    tracing::info!(added, "Added pasted lines");

    let mut message = format!("Added {} items.", added);
    if !not_found.is_empty() {
        message.push_str(&format!(
            " Skipped {} items (not found in catalog): {}",
            not_found.len(),
            not_found.join(", ")
        ));
    }

    Ok(PasteManifestResponse {
        success: added > 0,
        added,
        not_found,
        invalid_rows: parsed.errors,
        message,
    })
}

/// Add lines from manifest CSV; each row carries its own carton in `system`
pub fn import_manifest_csv(
    db: &Database,
    text: &str,
    system: Option<UnitSystem>,
) -> Result<ImportManifestResponse, String> {
    let parsed = import::parse_manifest_csv(text);

    for error in &parsed.errors {
        tracing::warn!(%error, "Skipped manifest row");
    }

    let imported = db
        .with_transaction(|tx| {
            let system = active_system(tx, system)?;
            let pallet = Settings::pallet(tx)?;
            for row in &parsed.rows {
                insert_line(tx, &pallet, &row.name, row.quantity, system, row.box_config.clone())?;
            }
            Ok(parsed.rows.len())
        })
        .map_err(|e| format!("Failed to import manifest: {}", e))?;

    tracing::info!(imported, skipped = parsed.errors.len(), "Imported manifest CSV");

    Ok(ImportManifestResponse {
        success: imported > 0,
        total_rows: parsed.total_rows,
        imported,
        skipped: parsed.errors.len(),
        message: if imported > 0 {
            format!("Imported {} lines", imported)
        } else {
            "No valid rows found in CSV".to_string()
        },
        errors: parsed.errors,
    })
}

/// Manifest CSV header plus one example row
pub fn manifest_template() -> TemplateResponse {
    TemplateResponse {
        filename: "manifest_template.csv".to_string(),
        content: format!("{}\nWidget A,500,15.5,12,10,8,20", MANIFEST_HEADER),
    }
}

/// Totals only, in `display` (or the active system)
pub fn manifest_summary(db: &Database, display: Option<UnitSystem>) -> Result<ManifestSummary, String> {
    list_lines(db, display).map(|m| m.summary)
}
