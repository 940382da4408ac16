//! Settings model
//!
//! Key/value user preferences: the active unit system, the active pallet
//! (stored with its own unit tag), and the seeded catalog version.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::units::UnitSystem;
use super::{Dimensions, PalletDefinition};

const KEY_UNIT_SYSTEM: &str = "unit_system";
const KEY_PALLET: &str = "pallet";
const KEY_CATALOG_VERSION: &str = "catalog_version";

/// Converted pallet extents are snapped to 1/N of a unit
const PALLET_EXTENT_SCALE: f64 = 1e6;

/// A pallet definition plus the system its dimensions are expressed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPallet {
    pub unit_system: UnitSystem,
    pub pallet: PalletDefinition,
}

impl Default for StoredPallet {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Imperial,
            pallet: PalletDefinition::gma_standard(),
        }
    }
}

impl StoredPallet {
    /// The pallet expressed in `target`, ready for calculation
    ///
    /// Converted extents are snapped to a micro-unit grid so a pallet stored in mm
    /// reads back as 48 in, not 47.99999999999999.
    pub fn in_system(&self, target: UnitSystem) -> PalletDefinition {
        if self.unit_system == target {
            return self.pallet.clone();
        }
        let mut pallet = self.pallet.converted(self.unit_system, target);
        let snap = |v: f64| (v * PALLET_EXTENT_SCALE).round() / PALLET_EXTENT_SCALE;
        pallet.dimensions = Dimensions::new(
            snap(pallet.dimensions.length),
            snap(pallet.dimensions.width),
            snap(pallet.dimensions.height),
        );
        pallet
    }
}

pub struct Settings;

impl Settings {
    fn get(conn: &Connection, key: &str) -> DbResult<Option<String>> {
        let value = conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// Active unit system (IMPERIAL until set)
    pub fn unit_system(conn: &Connection) -> DbResult<UnitSystem> {
        match Self::get(conn, KEY_UNIT_SYSTEM)? {
            Some(s) => UnitSystem::from_str(&s)
                .ok_or_else(|| DbError::InvalidData(format!("unknown unit system '{}'", s))),
            None => Ok(UnitSystem::default()),
        }
    }

    pub fn set_unit_system(conn: &Connection, system: UnitSystem) -> DbResult<()> {
        Self::set(conn, KEY_UNIT_SYSTEM, system.as_str())
    }

    /// Active pallet (GMA 48x40x62 in until set)
    pub fn pallet(conn: &Connection) -> DbResult<StoredPallet> {
        match Self::get(conn, KEY_PALLET)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| DbError::InvalidData(format!("pallet setting: {}", e))),
            None => Ok(StoredPallet::default()),
        }
    }

    pub fn set_pallet(conn: &Connection, pallet: &StoredPallet) -> DbResult<()> {
        let json = serde_json::to_string(pallet)
            .map_err(|e| DbError::InvalidData(format!("pallet setting: {}", e)))?;
        Self::set(conn, KEY_PALLET, &json)
    }

    /// Version of the default catalog last seeded (0 if never)
    pub fn catalog_version(conn: &Connection) -> DbResult<u32> {
        Ok(Self::get(conn, KEY_CATALOG_VERSION)?
            .and_then(|s| s.parse().ok())
            .unwrap_or(0))
    }

    pub fn set_catalog_version(conn: &Connection, version: u32) -> DbResult<()> {
        Self::set(conn, KEY_CATALOG_VERSION, &version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_defaults() {
        let conn = setup();
        assert_eq!(Settings::unit_system(&conn).unwrap(), UnitSystem::Imperial);
        assert_eq!(Settings::pallet(&conn).unwrap(), StoredPallet::default());
        assert_eq!(Settings::catalog_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_unit_system_persists() {
        let conn = setup();
        Settings::set_unit_system(&conn, UnitSystem::Metric).unwrap();
        assert_eq!(Settings::unit_system(&conn).unwrap(), UnitSystem::Metric);
        Settings::set_unit_system(&conn, UnitSystem::Imperial).unwrap();
        assert_eq!(Settings::unit_system(&conn).unwrap(), UnitSystem::Imperial);
    }

    #[test]
    fn test_pallet_keeps_its_unit_tag() {
        let conn = setup();
        let stored = StoredPallet {
            unit_system: UnitSystem::Metric,
            pallet: PalletDefinition {
                id: "euro".into(),
                name: "EUR-1".into(),
                dimensions: Dimensions::new(1200.0, 800.0, 1800.0),
            },
        };
        Settings::set_pallet(&conn, &stored).unwrap();

        let loaded = Settings::pallet(&conn).unwrap();
        assert_eq!(loaded, stored);

        let inches = loaded.in_system(UnitSystem::Imperial);
        assert!((inches.dimensions.length - 47.244094).abs() < 1e-5);
        assert_eq!(loaded.in_system(UnitSystem::Metric), stored.pallet);
    }

    #[test]
    fn test_metric_stored_gma_reads_back_as_whole_inches() {
        let stored = StoredPallet {
            unit_system: UnitSystem::Metric,
            pallet: PalletDefinition::gma_standard().converted(UnitSystem::Imperial, UnitSystem::Metric),
        };

        let inches = stored.in_system(UnitSystem::Imperial);
        assert_eq!(inches.dimensions, Dimensions::new(48.0, 40.0, 62.0));
        assert_eq!(stored.in_system(UnitSystem::Metric), stored.pallet);
    }
}
