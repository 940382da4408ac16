//! Set the active pallet and recalculate the manifest
//! Usage: cargo run --bin set_pallet -- <length> <width> <height> [metric|imperial]

use std::path::PathBuf;

use palletcalc::models::{Dimensions, PalletDefinition, Settings, StoredPallet};
use palletcalc::tools::manifest::recalculate_lines;
use palletcalc::units::{format_dual_length, UnitSystem};

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
            std::fs::create_dir_all(&path).ok();
            path.push("palletcalc.db");
            path
        })
}

fn parse_extent(args: &[String], index: usize, label: &str) -> Result<f64, String> {
    let raw = args
        .get(index)
        .ok_or_else(|| format!("missing {}", label))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("{} is not a number: {}", label, raw))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(format!("{} must be greater than 0", label));
    }
    Ok(value)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: set_pallet <length> <width> <height> [metric|imperial]");
        std::process::exit(2);
    }

    let length = parse_extent(&args, 1, "length")?;
    let width = parse_extent(&args, 2, "width")?;
    let height = parse_extent(&args, 3, "height")?;
    let system = match args.get(4) {
        Some(raw) => UnitSystem::from_str(raw).ok_or_else(|| format!("unknown unit system: {}", raw))?,
        None => UnitSystem::Imperial,
    };

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = palletcalc::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        palletcalc::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let mut pallet = PalletDefinition::gma_standard();
    pallet.dimensions = Dimensions::new(length, width, height);
    let stored = StoredPallet { unit_system: system, pallet };

    let outcome = database.with_transaction(|tx| {
        Settings::set_pallet(tx, &stored)?;
        recalculate_lines(tx)
    })?;

    println!("Pallet set ({}):", system);
    println!("  Length: {}", format_dual_length(length, system));
    println!("  Width:  {}", format_dual_length(width, system));
    println!("  Height: {}", format_dual_length(height, system));
    println!(
        "Recalculated {} lines ({} changed): {:.2} -> {:.2} pallets",
        outcome.lines, outcome.changed, outcome.pallets_before, outcome.pallets_after
    );

    Ok(())
}
