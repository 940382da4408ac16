//! Shipment Line model
//!
//! One manifest row. Owns a snapshot of its item and box, tagged with the unit
//! system they were entered in, plus the cached calculation result.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::units::UnitSystem;
use super::{BoxConfig, CalculationResult, Dimensions, ItemInput};

/// A manifest line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentLine {
    pub id: i64,
    pub item: ItemInput,
    /// System of every length/weight/volume on this line
    pub unit_system: UnitSystem,
    pub box_config: BoxConfig,
    pub result: CalculationResult,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new shipment line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentLineCreate {
    pub item: ItemInput,
    pub unit_system: UnitSystem,
    pub box_config: BoxConfig,
    pub result: CalculationResult,
}

/// SQLite integers are signed; counts beyond `i64::MAX` are stored clamped
fn count_to_sql(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl ShipmentLine {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let system: String = row.get("unit_system")?;
        let unit_system = UnitSystem::from_str(&system).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(DbError::InvalidData(format!("unknown unit system '{}'", system))),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            item: ItemInput {
                name: row.get("name")?,
                quantity: row.get("quantity")?,
            },
            unit_system,
            box_config: BoxConfig {
                items_per_box: row.get("items_per_box")?,
                dimensions: Dimensions {
                    length: row.get("length")?,
                    width: row.get("width")?,
                    height: row.get("height")?,
                },
                gross_weight: row.get("gross_weight")?,
            },
            result: CalculationResult {
                total_boxes: row.get::<_, i64>("total_boxes")?.max(0) as u64,
                total_gross_weight: row.get("total_gross_weight")?,
                total_volume: row.get("total_volume")?,
                pallets_required: row.get("pallets_required")?,
                boxes_per_pallet: row.get::<_, i64>("boxes_per_pallet")?.max(0) as u64,
                boxes_per_layer: row.get::<_, i64>("boxes_per_layer")?.max(0) as u64,
                pallet_layers: row.get::<_, i64>("pallet_layers")?.max(0) as u64,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new line into the manifest
    pub fn create(conn: &Connection, data: &ShipmentLineCreate) -> DbResult<Self> {
        let b = &data.box_config;
        let r = &data.result;
        conn.execute(
            r#"
            INSERT INTO shipment_lines (
                name, quantity, unit_system,
                items_per_box, length, width, height, gross_weight,
                total_boxes, total_gross_weight, total_volume, pallets_required,
                boxes_per_pallet, boxes_per_layer, pallet_layers
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                data.item.name,
                data.item.quantity,
                data.unit_system.as_str(),
                b.items_per_box,
                b.dimensions.length,
                b.dimensions.width,
                b.dimensions.height,
                b.gross_weight,
                count_to_sql(r.total_boxes),
                r.total_gross_weight,
                r.total_volume,
                r.pallets_required,
                count_to_sql(r.boxes_per_pallet),
                count_to_sql(r.boxes_per_layer),
                count_to_sql(r.pallet_layers),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shipment_lines WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(line) => Ok(Some(line)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All lines in insertion order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shipment_lines ORDER BY id ASC")?;

        let lines = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lines)
    }

    /// Replace the cached result (after a pallet change)
    pub fn update_result(conn: &Connection, id: i64, result: &CalculationResult) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE shipment_lines SET
                total_boxes = ?1, total_gross_weight = ?2, total_volume = ?3,
                pallets_required = ?4, boxes_per_pallet = ?5, boxes_per_layer = ?6,
                pallet_layers = ?7, updated_at = datetime('now')
            WHERE id = ?8
            "#,
            params![
                count_to_sql(result.total_boxes),
                result.total_gross_weight,
                result.total_volume,
                result.pallets_required,
                count_to_sql(result.boxes_per_pallet),
                count_to_sql(result.boxes_per_layer),
                count_to_sql(result.pallet_layers),
                id,
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM shipment_lines WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM shipment_lines", [])?)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM shipment_lines", [], |row| row.get(0))?;
        Ok(count)
    }
}
