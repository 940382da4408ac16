//! Bulk text import parsing
//!
//! Row parsers for catalog CSV, manifest CSV, and spreadsheet paste. Parsing is
//! unit-agnostic: values come back in whatever system the caller says the text
//! is in.

use std::fs;

use serde::Serialize;

use crate::models::{BoxConfig, Dimensions};

/// Catalog CSV header, in column order
pub const CATALOG_HEADER: &str = "Name,ItemsPerBox,Length,Width,Height,MasterCartonWeight";
/// Manifest CSV header, in column order
pub const MANIFEST_HEADER: &str =
    "Name,Quantity,MasterCartonWeight,BoxLength,BoxWidth,BoxHeight,ItemsPerBox";

/// A CSV template and a suggested file name
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub filename: String,
    pub content: String,
}

/// A catalog row: name and carton, in the source system
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub name: String,
    pub box_config: BoxConfig,
}

/// A manifest CSV row carrying its own carton, in the source system
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRow {
    pub name: String,
    pub quantity: f64,
    pub box_config: BoxConfig,
}

/// A pasted `name, quantity` pair to be matched against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct PasteRow {
    pub name: String,
    pub quantity: f64,
}

/// Rows that parsed plus a message per row that did not
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub rows: Vec<T>,
    pub errors: Vec<String>,
    pub total_rows: usize,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self { rows: Vec::new(), errors: Vec::new(), total_rows: 0 }
    }
}

/// Load import text from a file path or take it inline
pub fn read_source(file_path: Option<&str>, text: Option<&str>) -> Result<String, String> {
    match (file_path, text) {
        (Some(path), _) if !path.trim().is_empty() => fs::read_to_string(path.trim())
            .map_err(|e| format!("Failed to open file '{}': {}", path, e)),
        (_, Some(text)) => Ok(text.to_string()),
        _ => Err("Provide either file_path or text".to_string()),
    }
}

/// Lenient number parse: blank or malformed cells read as 0
fn number(cell: &str) -> f64 {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Items per box: missing or zero means 1, negatives are rejected
fn items_per_box(cell: &str) -> Result<u32, String> {
    let value = number(cell);
    if value < 0.0 {
        return Err(format!("items per box must be positive, got {}", cell.trim()));
    }
    if value == 0.0 {
        return Ok(1);
    }
    Ok(value.round().max(1.0).min(u32::MAX as f64) as u32)
}

fn is_header(line_num: usize, line: &str) -> bool {
    line_num == 0 && line.trim_start().to_lowercase().starts_with("name")
}

fn split_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate()
}

/// Parse `Name,ItemsPerBox,Length,Width,Height,MasterCartonWeight`
pub fn parse_catalog_csv(text: &str) -> Parsed<CatalogRow> {
    let mut parsed = Parsed::default();

    for (line_num, line) in split_lines(text) {
        if line.trim().is_empty() || is_header(line_num, line) {
            continue;
        }
        parsed.total_rows += 1;

        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        if cols.len() < 6 {
            parsed.errors.push(format!("Row {}: expected 6 columns, found {}", line_num + 1, cols.len()));
            continue;
        }

        let name = cols[0];
        if name.is_empty() {
            parsed.errors.push(format!("Row {}: missing name", line_num + 1));
            continue;
        }

        let items_per_box = match items_per_box(cols[1]) {
            Ok(n) => n,
            Err(e) => {
                parsed.errors.push(format!("Row {}: {}", line_num + 1, e));
                continue;
            }
        };

        parsed.rows.push(CatalogRow {
            name: name.to_string(),
            box_config: BoxConfig {
                items_per_box,
                dimensions: Dimensions::new(number(cols[2]), number(cols[3]), number(cols[4])),
                gross_weight: number(cols[5]),
            },
        });
    }

    parsed
}

/// Parse `Name,Quantity,MasterCartonWeight,BoxLength,BoxWidth,BoxHeight,ItemsPerBox`
pub fn parse_manifest_csv(text: &str) -> Parsed<ManifestRow> {
    let mut parsed = Parsed::default();

    for (line_num, line) in split_lines(text) {
        if line.trim().is_empty() || is_header(line_num, line) {
            continue;
        }
        parsed.total_rows += 1;

        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        if cols.len() < 7 {
            parsed.errors.push(format!("Row {}: expected 7 columns, found {}", line_num + 1, cols.len()));
            continue;
        }

        let name = cols[0];
        let quantity = number(cols[1]);
        if name.is_empty() || quantity <= 0.0 {
            parsed.errors.push(format!("Row {}: needs a name and a positive quantity", line_num + 1));
            continue;
        }

        let items_per_box = match items_per_box(cols[6]) {
            Ok(n) => n,
            Err(e) => {
                parsed.errors.push(format!("Row {}: {}", line_num + 1, e));
                continue;
            }
        };

        parsed.rows.push(ManifestRow {
            name: name.to_string(),
            quantity,
            box_config: BoxConfig {
                items_per_box,
                dimensions: Dimensions::new(number(cols[3]), number(cols[4]), number(cols[5])),
                gross_weight: number(cols[2]),
            },
        });
    }

    parsed
}

/// Parse spreadsheet paste: `Name<TAB>Quantity`, falling back to commas
pub fn parse_paste(text: &str) -> Parsed<PasteRow> {
    let mut parsed = Parsed::default();

    for (line_num, line) in split_lines(text) {
        if line.trim().is_empty() {
            continue;
        }
        parsed.total_rows += 1;

        let mut cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 2 {
            cols = line.split(',').collect();
        }
        if cols.len() < 2 {
            parsed.errors.push(format!("Row {}: expected name and quantity", line_num + 1));
            continue;
        }

        let name = cols[0].trim();
        let quantity = number(cols[1]);
        if name.is_empty() || quantity <= 0.0 {
            parsed.errors.push(format!("Row {}: needs a name and a positive quantity", line_num + 1));
            continue;
        }

        parsed.rows.push(PasteRow { name: name.to_string(), quantity });
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_csv_skips_header_and_short_rows() {
        let text = "Name,ItemsPerBox,Length,Width,Height,MasterCartonWeight\n\
                    Example Widget,12,24,16,12,33\n\
                    \n\
                    Broken,1,2\n\
                    No Count,,600,400,300,15000\n";
        let parsed = parse_catalog_csv(text);

        assert_eq!(parsed.total_rows, 3);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);

        let widget = &parsed.rows[0];
        assert_eq!(widget.name, "Example Widget");
        assert_eq!(widget.box_config.items_per_box, 12);
        assert_eq!(widget.box_config.dimensions, Dimensions::new(24.0, 16.0, 12.0));
        assert_eq!(widget.box_config.gross_weight, 33.0);

        assert_eq!(parsed.rows[1].box_config.items_per_box, 1);
    }

    #[test]
    fn test_catalog_csv_rejects_negative_count() {
        let parsed = parse_catalog_csv("A,-4,1,1,1,1");
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
    }

    #[test]
    fn test_catalog_csv_garbage_numbers_read_as_zero() {
        let parsed = parse_catalog_csv("A,10,abc,1,1,");
        assert_eq!(parsed.rows[0].box_config.dimensions.length, 0.0);
        assert_eq!(parsed.rows[0].box_config.gross_weight, 0.0);
    }

    #[test]
    fn test_manifest_csv() {
        let text = "Name,Quantity,MasterCartonWeight,BoxLength,BoxWidth,BoxHeight,ItemsPerBox\n\
                    Widget A,500,15.5,12,10,8,20\n\
                    Zero Qty,0,15.5,12,10,8,20\n\
                    Short,5,1\n";
        let parsed = parse_manifest_csv(text);

        assert_eq!(parsed.total_rows, 3);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 2);

        let row = &parsed.rows[0];
        assert_eq!(row.quantity, 500.0);
        assert_eq!(row.box_config.items_per_box, 20);
        assert_eq!(row.box_config.gross_weight, 15.5);
        assert_eq!(row.box_config.dimensions, Dimensions::new(12.0, 10.0, 8.0));
    }

    #[test]
    fn test_header_only_skipped_on_first_line() {
        let parsed = parse_manifest_csv("Widget,1,1,1,1,1,1\nname thing,2,1,1,1,1,1");
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn test_paste_tab_then_comma() {
        let text = "LAC180\t1000\r\nlsc101a, 250\nnothing here\nBad\t-3\n";
        let parsed = parse_paste(text);

        assert_eq!(parsed.total_rows, 4);
        assert_eq!(
            parsed.rows,
            vec![
                PasteRow { name: "LAC180".into(), quantity: 1000.0 },
                PasteRow { name: "lsc101a".into(), quantity: 250.0 },
            ]
        );
        assert_eq!(parsed.errors.len(), 2);
    }

    #[test]
    fn test_read_source_prefers_inline_when_no_path() {
        assert_eq!(read_source(None, Some("a,1")).unwrap(), "a,1");
        assert!(read_source(None, None).is_err());
        assert!(read_source(Some("/definitely/not/here.csv"), None).is_err());
    }
}
