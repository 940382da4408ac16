//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: catalog, manifest, settings
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PRODUCTS
        -- Catalog of master carton definitions, always METRIC
        -- ============================================
        CREATE TABLE products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            items_per_box INTEGER NOT NULL DEFAULT 1 CHECK(items_per_box >= 1),
            length_mm REAL NOT NULL DEFAULT 0,
            width_mm REAL NOT NULL DEFAULT 0,
            height_mm REAL NOT NULL DEFAULT 0,
            gross_weight_g REAL NOT NULL DEFAULT 0,   -- fully packed carton

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_products_name ON products(name COLLATE NOCASE);

        -- ============================================
        -- SHIPMENT LINES
        -- Manifest entries; each owns a copy of its box and cached result.
        -- Every length/weight/volume column is in unit_system.
        -- ============================================
        CREATE TABLE shipment_lines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit_system TEXT NOT NULL CHECK(unit_system IN ('METRIC', 'IMPERIAL')),

            -- Box snapshot
            items_per_box INTEGER NOT NULL,
            length REAL NOT NULL,
            width REAL NOT NULL,
            height REAL NOT NULL,
            gross_weight REAL NOT NULL,

            -- Cached calculation - recalculated when quantity, box, or pallet changes
            total_boxes INTEGER NOT NULL DEFAULT 0,
            total_gross_weight REAL NOT NULL DEFAULT 0,
            total_volume REAL NOT NULL DEFAULT 0,
            pallets_required REAL NOT NULL DEFAULT 0,
            boxes_per_pallet INTEGER NOT NULL DEFAULT 1,
            boxes_per_layer INTEGER NOT NULL DEFAULT 0,
            pallet_layers INTEGER NOT NULL DEFAULT 0,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- SETTINGS
        -- Key/value user preferences (unit system, pallet, catalog version)
        -- ============================================
        CREATE TABLE settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
