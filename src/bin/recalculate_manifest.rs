//! Recalculate every manifest line against the stored pallet
//! Usage: cargo run --bin recalculate_manifest

use std::path::PathBuf;

use palletcalc::models::{Settings, ShipmentLine};
use palletcalc::tools::manifest::recalculate_lines;

fn get_database_path() -> PathBuf {
    std::env::var("PALLETCALC_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("palletcalc.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = palletcalc::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        palletcalc::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let before = database.with_conn(|conn| ShipmentLine::list(conn))?;

    let outcome = database.with_transaction(|tx| {
        let pallet = Settings::pallet(tx)?;
        let d = &pallet.pallet.dimensions;
        println!(
            "Pallet: {} x {} x {} {} ({})",
            d.length,
            d.width,
            d.height,
            pallet.unit_system.length_label(),
            pallet.pallet.name
        );
        recalculate_lines(tx)
    })?;

    let after = database.with_conn(|conn| ShipmentLine::list(conn))?;

    for (old, new) in before.iter().zip(after.iter()) {
        if old.result == new.result {
            continue;
        }
        println!(
            "  Line {} ({}): {:.2} -> {:.2} pallets ({} -> {} boxes per pallet)",
            new.id,
            new.item.name,
            old.result.pallets_required,
            new.result.pallets_required,
            old.result.boxes_per_pallet,
            new.result.boxes_per_pallet
        );
    }

    println!("\nLines: {}", outcome.lines);
    println!("Changed: {}", outcome.changed);
    println!("Pallets: {:.2} -> {:.2}", outcome.pallets_before, outcome.pallets_after);

    Ok(())
}
