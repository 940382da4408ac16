//! Default product catalog
//!
//! Seeds the catalog with the standard carton list (METRIC: mm, g). A bump of
//! `CATALOG_VERSION` replaces the stored catalog with this list on next start.

use rusqlite::Connection;

use super::connection::DbResult;
use crate::models::{BoxConfig, Dimensions, Product, ProductCreate, Settings};

/// Version of the bundled catalog
pub const CATALOG_VERSION: u32 = 2;

/// (sku, items per box, length mm, width mm, height mm, gross weight g)
///
/// Cartons with all-zero geometry have not been measured yet.
const DEFAULT_PRODUCTS: &[(&str, u32, f64, f64, f64, f64)] = &[
    ("LAC172B", 100, 0.0, 0.0, 0.0, 0.0),
    ("LAC180", 500, 315.0, 415.0, 315.0, 11850.0),
    ("LAC181", 250, 360.0, 535.0, 265.0, 6025.0),
    ("LLL147A", 1600, 340.0, 230.0, 290.0, 13200.0),
    ("LLL147A-ROW", 1600, 340.0, 230.0, 290.0, 13850.0),
    ("LLL162A", 1600, 340.0, 230.0, 290.0, 13200.0),
    ("LLL167D", 1600, 340.0, 230.0, 290.0, 13200.0),
    ("LML2001A", 420, 600.0, 500.0, 400.0, 7500.0),
    ("LML2001B", 230, 600.0, 500.0, 400.0, 7000.0),
    ("LML2006A", 100, 640.0, 620.0, 220.0, 14700.0),
    ("LML2006B", 100, 720.0, 680.0, 220.0, 17000.0),
    ("LSC101A", 384, 315.0, 500.0, 165.0, 12000.0),
    ("LSC101C", 70, 325.0, 470.0, 260.0, 13000.0),
    ("LSC102A", 384, 320.0, 490.0, 180.0, 12000.0),
    ("LSC102C", 116, 320.0, 490.0, 180.0, 6500.0),
    ("LSC104A", 384, 320.0, 490.0, 180.0, 12000.0),
    ("LSC104B", 96, 325.0, 470.0, 260.0, 11640.0),
    ("LSC105A", 384, 320.0, 490.0, 180.0, 11920.0),
    ("LSC105B", 96, 320.0, 490.0, 180.0, 11640.0),
    ("LSC108A", 384, 320.0, 490.0, 180.0, 12000.0),
    ("LSC108B", 84, 320.0, 490.0, 180.0, 13700.0),
    ("LSC109A", 384, 320.0, 490.0, 180.0, 11850.0),
    ("LSC109B", 96, 325.0, 470.0, 260.0, 8000.0),
    ("LSC110A", 528, 325.0, 470.0, 260.0, 12000.0),
    ("LSC110B", 96, 320.0, 490.0, 180.0, 12500.0),
    ("LSC112B", 36, 320.0, 490.0, 180.0, 13100.0),
    ("LSC113B", 30, 320.0, 490.0, 180.0, 5500.0),
    ("LSC114B", 150, 290.0, 390.0, 273.0, 6500.0),
    ("LSC115A", 80, 320.0, 490.0, 180.0, 6450.0),
    ("LSC142A", 96, 325.0, 470.0, 260.0, 8000.0),
    ("LSC142FT", 528, 325.0, 470.0, 260.0, 12000.0),
    ("LSC143A", 96, 325.0, 470.0, 260.0, 9000.0),
    ("LSC143FT", 528, 325.0, 470.0, 260.0, 12000.0),
    ("LSC144B", 36, 320.0, 490.0, 180.0, 13100.0),
    ("LSC145A", 504, 325.0, 470.0, 260.0, 12500.0),
    ("LSC146A", 96, 325.0, 470.0, 260.0, 8850.0),
    ("LSC148A", 60, 235.0, 485.0, 190.0, 13700.0),
    ("LSC149A", 80, 300.0, 380.0, 180.0, 13000.0),
    ("LSC150A", 72, 230.0, 445.0, 195.0, 9400.0),
    ("LSC153A", 84, 500.0, 400.0, 400.0, 27300.0),
    ("LSC161A", 40, 390.0, 765.0, 285.0, 19820.0),
    ("LSC177A", 96, 325.0, 470.0, 260.0, 8000.0),
    ("LSC177FT", 528, 325.0, 470.0, 260.0, 12000.0),
    ("LSC178A", 96, 325.0, 470.0, 260.0, 8000.0),
    ("LSC178FT", 528, 325.0, 470.0, 260.0, 12000.0),
    ("LSC179A", 96, 325.0, 470.0, 260.0, 8000.0),
    ("LSC179FT", 528, 325.0, 470.0, 260.0, 12000.0),
    ("M2A", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2A-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2B", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2B-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2C", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2C-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2E", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2P_AC", 40, 387.0, 375.0, 375.0, 12700.0),
    ("M2P_FC", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MAC105A", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105A-FD", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105B", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105B-FD", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105C", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105C-FD", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105D", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105D-FD", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105E", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105E-FD", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105F", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105F-FD", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC105G", 100, 490.0, 320.0, 210.0, 700.0),
    ("MAC116A", 80, 520.0, 500.0, 500.0, 17900.0),
    ("MAC116B", 80, 520.0, 500.0, 500.0, 17900.0),
    ("MAC116C", 80, 520.0, 500.0, 500.0, 17900.0),
    ("MAC134I", 200, 390.0, 380.0, 380.0, 7900.0),
    ("MAC134J", 200, 390.0, 380.0, 380.0, 7900.0),
    ("MAC134K", 200, 390.0, 380.0, 380.0, 7900.0),
    ("MAC143B", 100, 0.0, 0.0, 0.0, 0.0),
    ("MAC151A", 100, 490.0, 320.0, 210.0, 2000.0),
    ("MAC151B", 100, 490.0, 320.0, 210.0, 2000.0),
    ("MAC151E", 100, 490.0, 320.0, 210.0, 2000.0),
    ("MEC102A", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102A-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102B", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102B-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102C", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102C-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102D", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102D-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102E", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102E-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102F", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC102F-FD", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC120A", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120A-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120B", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120B-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120C", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120C-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120D", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120D-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120E", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120E-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120F", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120F-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120G", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC120G-FD", 40, 510.0, 470.0, 400.0, 21000.0),
    ("MEC146A", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC146B", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC146E", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MEC146H", 40, 387.0, 375.0, 375.0, 12700.0),
    ("MML125", 420, 600.0, 500.0, 400.0, 8000.0),
    ("MML140", 75, 970.0, 1000.0, 250.0, 24000.0),
    ("MML140A", 75, 970.0, 1000.0, 250.0, 24000.0),
    ("MSC136A", 24, 355.0, 228.0, 228.0, 6180.0),
    ("MSC137A", 40, 508.0, 381.0, 203.0, 13200.0),
    ("MSC138A", 48, 342.0, 267.0, 165.0, 7710.0),
    ("R_LSC101C", 24, 316.0, 214.0, 190.0, 3498.0),
    ("R_LSC102C", 24, 286.0, 194.0, 134.0, 1554.0),
    ("R_LSC104B", 24, 352.0, 238.0, 134.0, 2409.0),
    ("R_LSC109B", 24, 352.0, 238.0, 120.0, 2175.0),
    ("R_LSC110B", 24, 274.0, 186.0, 151.0, 2859.0),
    ("R_LSC113B", 24, 328.0, 300.0, 203.0, 3916.0),
    ("R_LSC114B", 24, 322.0, 184.0, 146.0, 1246.0),
    ("R_LSC115A", 24, 262.0, 214.0, 156.0, 2452.0),
    ("R_LSC142A", 24, 352.0, 238.0, 162.0, 2220.0),
    ("R_LSC143A", 24, 352.0, 238.0, 162.0, 2547.0),
    ("R_LSC146A", 24, 352.0, 238.0, 120.0, 2283.0),
    ("R_LSC149A", 24, 245.0, 164.0, 173.0, 4200.0),
    ("R_LSC177A", 24, 352.0, 238.0, 162.0, 2220.0),
    ("R_LSC178A", 24, 352.0, 238.0, 162.0, 2220.0),
    ("R_LSC179A", 24, 352.0, 238.0, 162.0, 2220.0),
    ("R_MAC105A", 48, 340.0, 266.0, 113.0, 2500.0),
    ("R_MAC105B", 48, 340.0, 266.0, 113.0, 2500.0),
    ("R_MAC105C", 48, 340.0, 266.0, 113.0, 2500.0),
    ("R_MAC105D", 48, 340.0, 266.0, 113.0, 2500.0),
    ("R_MAC105E", 48, 340.0, 226.0, 113.0, 2500.0),
    ("R_MAC105F", 48, 340.0, 226.0, 113.0, 2500.0),
    ("R_MAC116A", 24, 400.0, 400.0, 210.0, 2880.0),
    ("R_MAC116B", 24, 400.0, 400.0, 210.0, 2880.0),
    ("R_MAC116C", 24, 400.0, 400.0, 210.0, 2880.0),
    ("R_MAC151B", 48, 340.0, 226.0, 113.0, 2500.0),
    ("R_MAC151E", 48, 340.0, 226.0, 113.0, 2500.0),
    ("R_MBN103A", 6, 337.0, 230.0, 195.0, 0.0),
    ("R_MEC102A", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC102B", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC102C", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC102D", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC102E", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC102F", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC120A", 12, 440.0, 435.0, 185.0, 7000.0),
    ("R_MEC120B", 12, 440.0, 435.0, 185.0, 7000.0),
    ("R_MEC120C", 12, 440.0, 435.0, 185.0, 7000.0),
    ("R_MEC120D", 12, 440.0, 435.0, 185.0, 7000.0),
    ("R_MEC120E", 12, 440.0, 435.0, 185.0, 7000.0),
    ("R_MEC120F", 12, 440.0, 435.0, 185.0, 7000.0),
    ("R_MEC135A", 12, 385.0, 360.0, 240.0, 5800.0),
    ("R_MEC135B", 12, 385.0, 360.0, 240.0, 5800.0),
    ("R_MEC135C", 12, 385.0, 360.0, 240.0, 5800.0),
    ("R_MEC135E", 12, 385.0, 360.0, 240.0, 5800.0),
    ("R_MEC135G", 12, 385.0, 360.0, 240.0, 5800.0),
    ("R_MEC146A", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC146B", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MEC146E", 12, 385.0, 360.0, 240.0, 5920.0),
    ("R_MHB101", 24, 274.0, 186.0, 129.0, 0.0),
    ("R_MSC136A", 12, 0.0, 0.0, 0.0, 0.0),
    ("R_MSC137A", 12, 0.0, 0.0, 0.0, 0.0),
    ("SM1", 400, 680.0, 450.0, 300.0, 14100.0),
];

/// Bundled catalog as insertable records
pub fn default_products() -> Vec<ProductCreate> {
    DEFAULT_PRODUCTS
        .iter()
        .map(|&(sku, items_per_box, length, width, height, gross_weight)| ProductCreate {
            id: Some(sku.to_string()),
            name: sku.to_string(),
            box_config: BoxConfig {
                items_per_box,
                dimensions: Dimensions::new(length, width, height),
                gross_weight,
            },
        })
        .collect()
}

/// Replace the catalog with the bundled list, regardless of stored version
pub fn reset_catalog(conn: &Connection) -> DbResult<usize> {
    Product::delete_all(conn)?;
    let products = default_products();
    for product in &products {
        Product::create(conn, product)?;
    }
    Settings::set_catalog_version(conn, CATALOG_VERSION)?;
    Ok(products.len())
}

/// Seed the catalog if it was never seeded or was seeded by an older version
///
/// Returns the number of products loaded (0 when already current).
pub fn seed_catalog_if_outdated(conn: &Connection) -> DbResult<usize> {
    let stored = Settings::catalog_version(conn)?;
    if stored >= CATALOG_VERSION {
        return Ok(0);
    }

    let count = reset_catalog(conn)?;
    tracing::info!(
        from_version = stored,
        to_version = CATALOG_VERSION,
        products = count,
        "Seeded default catalog"
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_default_catalog_is_metric_and_sane() {
        let products = default_products();
        assert!(!products.is_empty());
        for p in &products {
            assert!(p.box_config.items_per_box >= 1, "{} has no items per box", p.name);
            assert!(p.box_config.gross_weight >= 0.0);
        }

        let lac180 = products.iter().find(|p| p.name == "LAC180").unwrap();
        assert_eq!(lac180.box_config.dimensions, Dimensions::new(315.0, 415.0, 315.0));
        assert_eq!(lac180.box_config.gross_weight, 11850.0);
    }

    #[test]
    fn test_seed_runs_once_per_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let seeded = seed_catalog_if_outdated(&conn).unwrap();
        assert_eq!(seeded, DEFAULT_PRODUCTS.len());
        assert_eq!(Product::count(&conn).unwrap() as usize, DEFAULT_PRODUCTS.len());
        assert_eq!(Settings::catalog_version(&conn).unwrap(), CATALOG_VERSION);

        assert_eq!(seed_catalog_if_outdated(&conn).unwrap(), 0);
    }

    #[test]
    fn test_outdated_version_replaces_catalog() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        seed_catalog_if_outdated(&conn).unwrap();
        Product::delete(&conn, "LAC180").unwrap();
        Settings::set_catalog_version(&conn, 1).unwrap();

        seed_catalog_if_outdated(&conn).unwrap();
        assert!(Product::get_by_id(&conn, "LAC180").unwrap().is_some());
    }
}
