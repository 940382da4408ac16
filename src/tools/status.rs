//! Status Tool
//!
//! Runtime status of the pallet calculator service, plus the usage guide served
//! to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How to drive the calculator tools
pub const USAGE_INSTRUCTIONS: &str = r#"
# Pallet Calculator Instructions

The pallet calculator estimates how many master cartons and pallets a shipment
needs. It keeps a product catalog, a manifest of shipment lines, and two
settings: the active unit system and the active pallet.

## Unit Systems

| System   | Length | Weight | Volume shown as |
|----------|--------|--------|-----------------|
| METRIC   | mm     | g      | m³              |
| IMPERIAL | in     | lb     | ft³             |

- The catalog is stored in METRIC. Pass `unit_system` to read or write it in
  IMPERIAL; values are converted at the edge.
- Each manifest line remembers the system it was added in. Totals convert every
  line into the requested display system.
- The pallet remembers the system it was entered in and is converted into each
  line's system for calculation.

## Typical Workflow

1. `get_settings` to see the active unit system and pallet
2. `set_unit_system` / `set_pallet` if needed (default: IMPERIAL, 48 x 40 in, 62 in high)
3. Add lines:
   - `add_line` with `product_id` for a catalog product
   - `add_line` with an explicit box (`items_per_box`, `length`, `width`, `height`, `gross_weight`)
   - `paste_manifest` with rows copied from a spreadsheet: `Name<TAB>Qty`
   - `import_manifest_csv` for rows that carry their own carton
4. `manifest_summary` for totals and the number of pallets to order

## Box Dimensions

- `gross_weight` is the weight of one FULL master carton, not one item.
- Catalog cartons are rounded to whole units when added to a line.
- Box height never rotates; the calculator tries both footprint orientations.

## Pallet Counts

- `pallets_required` on a line is fractional (2 decimals), e.g. 2.68
- `pallets_to_order` rounds the total up to whole pallets
- A carton that does not fit the pallet at all is counted as one box per pallet

## CSV Formats

Catalog (`import_catalog_csv`, `catalog_template`):
```
Name,ItemsPerBox,Length,Width,Height,MasterCartonWeight
Example Widget,12,600,400,300,15000
```

Manifest (`import_manifest_csv`, `manifest_template`):
```
Name,Quantity,MasterCartonWeight,BoxLength,BoxWidth,BoxHeight,ItemsPerBox
Widget A,500,15.5,12,10,8,20
```

- A first row starting with "Name" is treated as a header
- Import tools accept either `text` or a `file_path`
- Malformed numbers read as 0; a missing items-per-box reads as 1

## Changing the Pallet

`set_pallet` recalculates every manifest line by default. If lines were added
while an old pallet was active, call `recalculate_manifest` to refresh them.

## Standalone Calculations

`convert_length`, `convert_weight`, `convert_box`, `pallet_fit`, and
`line_metrics` compute without touching the manifest.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/palletcalc.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_instructions_document_both_csv_headers() {
        assert!(USAGE_INSTRUCTIONS.contains(crate::tools::import::CATALOG_HEADER));
        assert!(USAGE_INSTRUCTIONS.contains(crate::tools::import::MANIFEST_HEADER));
    }
}
