//! Pallet Calculator MCP Server Implementation
//!
//! Implements the MCP server with all calculator, catalog, manifest, and
//! settings tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{BoxConfig, Dimensions, Settings};
use crate::tools::catalog::{self, ProductInput, ProductPatch};
use crate::tools::manifest::{self, LineInput};
use crate::tools::status::StatusTracker;
use crate::tools::{calculator, import, settings};
use crate::units::UnitSystem;

/// Pallet Calculator MCP Service
#[derive(Clone)]
pub struct PalletCalcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<PalletCalcService>,
}

impl PalletCalcService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }

    /// Parse an optional unit system argument
    fn parse_system(raw: Option<&str>) -> Result<Option<UnitSystem>, McpError> {
        match raw {
            None => Ok(None),
            Some(s) => UnitSystem::from_str(s).map(Some).ok_or_else(|| {
                McpError::invalid_params(
                    format!("Unknown unit system '{}': use METRIC or IMPERIAL", s),
                    None,
                )
            }),
        }
    }

    /// Parse an optional unit system argument, falling back to the active one
    fn resolve_system(&self, raw: Option<&str>) -> Result<UnitSystem, McpError> {
        match Self::parse_system(raw)? {
            Some(system) => Ok(system),
            None => self
                .database
                .with_conn(|conn| Settings::unit_system(conn))
                .map_err(|e| McpError::internal_error(format!("Database error: {}", e), None)),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertValueParams {
    /// Value to convert
    pub value: f64,
    /// System the value is in: METRIC (mm/g) or IMPERIAL (in/lb). Converted to the other one.
    pub from_unit_system: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertBoxParams {
    pub items_per_box: u32,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Weight of one full master carton
    pub gross_weight: f64,
    /// METRIC or IMPERIAL
    pub from_unit_system: String,
    /// METRIC or IMPERIAL
    pub to_unit_system: String,
    /// Round extents to whole units (default false)
    #[serde(default)]
    pub round: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PalletFitParams {
    pub box_length: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub pallet_length: f64,
    pub pallet_width: f64,
    /// Maximum stack height
    pub pallet_height: f64,
    /// METRIC or IMPERIAL, shared by box and pallet (default: active system)
    pub unit_system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LineMetricsParams {
    /// Number of items to ship
    pub quantity: f64,
    pub items_per_box: u32,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Weight of one full master carton
    pub gross_weight: f64,
    /// Pallet extents; all three or none (defaults to the active pallet)
    pub pallet_length: Option<f64>,
    pub pallet_width: Option<f64>,
    pub pallet_height: Option<f64>,
    /// METRIC or IMPERIAL (default: active system)
    pub unit_system: Option<String>,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    /// Catalog id / SKU (generated if omitted)
    pub id: Option<String>,
    pub name: String,
    pub items_per_box: u32,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Weight of one full master carton
    pub gross_weight: f64,
    /// System of the values above (default: active system)
    pub unit_system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductIdParams {
    /// Product id / SKU
    pub id: String,
    /// System to report values in (default: active system)
    pub unit_system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProductsParams {
    /// System to report values in (default: active system)
    pub unit_system: Option<String>,
    /// Maximum results (default 100)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchProductsParams {
    /// Substring of the product name or id
    pub query: String,
    pub unit_system: Option<String>,
    /// Maximum results (default 20)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProductParams {
    pub id: String,
    pub name: Option<String>,
    pub items_per_box: Option<u32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub gross_weight: Option<f64>,
    /// System of the values above (default: active system)
    pub unit_system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ForceParams {
    /// Must be true; this removes data
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportCsvParams {
    /// CSV content
    pub text: Option<String>,
    /// Path to a CSV file (used instead of text)
    pub file_path: Option<String>,
    /// System of the values in the file (default: active system)
    pub unit_system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UnitSystemParams {
    /// METRIC or IMPERIAL (default: active system)
    pub unit_system: Option<String>,
}

// ============================================================================
// Manifest Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddLineParams {
    /// Item name (defaults to the product name; looked up in the catalog if no box is given)
    pub name: Option<String>,
    /// Number of items to ship
    pub quantity: f64,
    /// Catalog product to take the carton from
    pub product_id: Option<String>,
    /// Explicit carton (instead of product_id): length, width, height, gross_weight
    pub items_per_box: Option<u32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub gross_weight: Option<f64>,
    /// System of the line (default: active system)
    pub unit_system: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveLineParams {
    /// Line ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PasteManifestParams {
    /// Rows of `Name<TAB>Quantity` (or `Name,Quantity`), one per line
    pub text: String,
    /// System for the new lines (default: active system)
    pub unit_system: Option<String>,
}

// ============================================================================
// Settings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetUnitSystemParams {
    /// METRIC or IMPERIAL
    pub unit_system: String,
}

fn default_true() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetPalletParams {
    pub length: f64,
    pub width: f64,
    /// Maximum stack height
    pub height: f64,
    /// System of the values above (default: active system)
    pub unit_system: Option<String>,
    pub name: Option<String>,
    /// Recalculate every manifest line (default true)
    #[serde(default = "default_true")]
    pub recalculate: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl PalletCalcService {
    // --- Status ---

    #[tool(description = "Get the current status of the pallet calculator service including build info, database status, and process information")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for using the pallet calculator: unit systems, workflow, CSV formats. Call this when starting a session or when unsure how to use the tools.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Calculator ---

    #[tool(description = "Convert a length between inches and millimeters")]
    fn convert_length(&self, Parameters(p): Parameters<ConvertValueParams>) -> Result<CallToolResult, McpError> {
        let from = self.resolve_system(Some(&p.from_unit_system))?;
        let result = calculator::convert_length(p.value, from).map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Convert a weight between pounds and grams")]
    fn convert_weight(&self, Parameters(p): Parameters<ConvertValueParams>) -> Result<CallToolResult, McpError> {
        let from = self.resolve_system(Some(&p.from_unit_system))?;
        let result = calculator::convert_weight(p.value, from).map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Convert a master carton (extents and gross weight) between unit systems")]
    fn convert_box(&self, Parameters(p): Parameters<ConvertBoxParams>) -> Result<CallToolResult, McpError> {
        let from = self.resolve_system(Some(&p.from_unit_system))?;
        let to = self.resolve_system(Some(&p.to_unit_system))?;
        let box_config = BoxConfig {
            items_per_box: p.items_per_box,
            dimensions: Dimensions::new(p.length, p.width, p.height),
            gross_weight: p.gross_weight,
        };
        json_result(&calculator::convert_box(&box_config, from, to, p.round))
    }

    #[tool(description = "How many boxes of one size fit on a pallet (boxes per layer, layers, total)")]
    fn pallet_fit(&self, Parameters(p): Parameters<PalletFitParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let result = calculator::pallet_fit(
            &Dimensions::new(p.box_length, p.box_width, p.box_height),
            &Dimensions::new(p.pallet_length, p.pallet_width, p.pallet_height),
            system,
        );
        json_result(&result)
    }

    #[tool(description = "Calculate boxes, weight, volume, and pallets for a quantity without adding it to the manifest")]
    fn line_metrics(&self, Parameters(p): Parameters<LineMetricsParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let pallet = match (p.pallet_length, p.pallet_width, p.pallet_height) {
            (Some(l), Some(w), Some(h)) => Dimensions::new(l, w, h),
            (None, None, None) => self
                .database
                .with_conn(|conn| Settings::pallet(conn))
                .map_err(|e| McpError::internal_error(format!("Database error: {}", e), None))?
                .in_system(system)
                .dimensions,
            _ => {
                return Err(McpError::invalid_params(
                    "Give pallet_length, pallet_width, and pallet_height together",
                    None,
                ))
            }
        };
        let box_config = BoxConfig {
            items_per_box: p.items_per_box,
            dimensions: Dimensions::new(p.length, p.width, p.height),
            gross_weight: p.gross_weight,
        };
        let result = calculator::line_metrics(p.quantity, &box_config, &pallet, system)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Catalog ---

    #[tool(description = "Add a product (master carton definition) to the catalog. Values are stored in METRIC.")]
    fn add_product(&self, Parameters(p): Parameters<AddProductParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let input = ProductInput {
            id: p.id,
            name: p.name,
            box_config: BoxConfig {
                items_per_box: p.items_per_box,
                dimensions: Dimensions::new(p.length, p.width, p.height),
                gross_weight: p.gross_weight,
            },
            unit_system: system,
        };
        let result = catalog::add_product(&self.database, input).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a catalog product by id")]
    fn get_product(&self, Parameters(p): Parameters<ProductIdParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let result = catalog::get_product(&self.database, &p.id, system).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(product) => serde_json::to_string_pretty(&product),
            None => Ok(format!(r#"{{"error": "Product not found", "id": {:?}}}"#, p.id)),
        }
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List catalog products sorted by name, with pagination")]
    fn list_products(&self, Parameters(p): Parameters<ListProductsParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let result = catalog::list_products(&self.database, system, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Search catalog products by name or id")]
    fn search_products(&self, Parameters(p): Parameters<SearchProductsParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let result = catalog::search_products(&self.database, &p.query, system, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a catalog product. Existing manifest lines keep their own carton.")]
    fn update_product(&self, Parameters(p): Parameters<UpdateProductParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let patch = ProductPatch {
            name: p.name,
            items_per_box: p.items_per_box,
            length: p.length,
            width: p.width,
            height: p.height,
            gross_weight: p.gross_weight,
            unit_system: system,
        };
        let result = catalog::update_product(&self.database, &p.id, patch).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a catalog product")]
    fn delete_product(&self, Parameters(p): Parameters<ProductIdParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::delete_product(&self.database, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove every catalog product. Requires force=true.")]
    fn clear_catalog(&self, Parameters(p): Parameters<ForceParams>) -> Result<CallToolResult, McpError> {
        if !p.force {
            return Err(McpError::invalid_params("clear_catalog removes every product; pass force=true", None));
        }
        let result = catalog::clear_catalog(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Replace the catalog with the bundled default products. Requires force=true.")]
    fn reset_catalog(&self, Parameters(p): Parameters<ForceParams>) -> Result<CallToolResult, McpError> {
        if !p.force {
            return Err(McpError::invalid_params("reset_catalog replaces every product; pass force=true", None));
        }
        let result = catalog::reset_catalog(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Import products from CSV: Name,ItemsPerBox,Length,Width,Height,MasterCartonWeight")]
    fn import_catalog_csv(&self, Parameters(p): Parameters<ImportCsvParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let text = import::read_source(p.file_path.as_deref(), p.text.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        let result = catalog::import_catalog_csv(&self.database, &text, system)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a catalog CSV template with an example row in the given unit system")]
    fn catalog_template(&self, Parameters(p): Parameters<UnitSystemParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        json_result(&catalog::catalog_template(system))
    }

    // --- Manifest ---

    #[tool(description = "Add a shipment line from a catalog product (product_id or name) or an explicit carton")]
    fn add_line(&self, Parameters(p): Parameters<AddLineParams>) -> Result<CallToolResult, McpError> {
        let unit_system = Self::parse_system(p.unit_system.as_deref())?;
        let box_config = match (p.length, p.width, p.height, p.gross_weight) {
            (Some(l), Some(w), Some(h), Some(g)) => Some(BoxConfig {
                items_per_box: p.items_per_box.unwrap_or(1),
                dimensions: Dimensions::new(l, w, h),
                gross_weight: g,
            }),
            (None, None, None, None) => None,
            _ => {
                return Err(McpError::invalid_params(
                    "An explicit carton needs length, width, height, and gross_weight",
                    None,
                ))
            }
        };
        let input = LineInput {
            name: p.name,
            quantity: p.quantity,
            product_id: p.product_id,
            box_config,
            unit_system,
        };
        let result = manifest::add_line(&self.database, input).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List all manifest lines with totals")]
    fn list_lines(&self, Parameters(p): Parameters<UnitSystemParams>) -> Result<CallToolResult, McpError> {
        let system = Self::parse_system(p.unit_system.as_deref())?;
        let result = manifest::list_lines(&self.database, system).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a manifest line")]
    fn remove_line(&self, Parameters(p): Parameters<RemoveLineParams>) -> Result<CallToolResult, McpError> {
        let result = manifest::remove_line(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove every manifest line. Requires force=true.")]
    fn clear_manifest(&self, Parameters(p): Parameters<ForceParams>) -> Result<CallToolResult, McpError> {
        if !p.force {
            return Err(McpError::invalid_params("clear_manifest removes every line; pass force=true", None));
        }
        let result = manifest::clear_manifest(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Recalculate every manifest line against the active pallet")]
    fn recalculate_manifest(&self) -> Result<CallToolResult, McpError> {
        let result = manifest::recalculate_manifest(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add lines from spreadsheet rows (Name<TAB>Quantity). Names are matched against the catalog case-insensitively; unmatched names are reported.")]
    fn paste_manifest(&self, Parameters(p): Parameters<PasteManifestParams>) -> Result<CallToolResult, McpError> {
        let system = Self::parse_system(p.unit_system.as_deref())?;
        let result = manifest::paste_manifest(&self.database, &p.text, system)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Import manifest lines from CSV: Name,Quantity,MasterCartonWeight,BoxLength,BoxWidth,BoxHeight,ItemsPerBox")]
    fn import_manifest_csv(&self, Parameters(p): Parameters<ImportCsvParams>) -> Result<CallToolResult, McpError> {
        let system = Self::parse_system(p.unit_system.as_deref())?;
        let text = import::read_source(p.file_path.as_deref(), p.text.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        let result = manifest::import_manifest_csv(&self.database, &text, system)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a manifest CSV template with an example row")]
    fn manifest_template(&self) -> Result<CallToolResult, McpError> {
        json_result(&manifest::manifest_template())
    }

    #[tool(description = "Manifest totals: items, boxes, weight (lb and kg), volume, pallets required and pallets to order")]
    fn manifest_summary(&self, Parameters(p): Parameters<UnitSystemParams>) -> Result<CallToolResult, McpError> {
        let system = Self::parse_system(p.unit_system.as_deref())?;
        let result = manifest::manifest_summary(&self.database, system).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Settings ---

    #[tool(description = "Get the active unit system and pallet")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the active unit system (METRIC or IMPERIAL)")]
    fn set_unit_system(&self, Parameters(p): Parameters<SetUnitSystemParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(Some(&p.unit_system))?;
        let result = settings::set_unit_system(&self.database, system).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the active pallet (length, width, maximum stack height). Recalculates the manifest unless recalculate=false.")]
    fn set_pallet(&self, Parameters(p): Parameters<SetPalletParams>) -> Result<CallToolResult, McpError> {
        let system = self.resolve_system(p.unit_system.as_deref())?;
        let result = settings::set_pallet(
            &self.database,
            Dimensions::new(p.length, p.width, p.height),
            system,
            p.name,
            p.recalculate,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for PalletCalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "palletcalc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Pallet Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Pallet Calculator - master carton, weight, volume, and pallet estimates for shipments. \
                 IMPORTANT: Call usage_instructions first. \
                 Calculator: convert_length, convert_weight, convert_box, pallet_fit, line_metrics. \
                 Catalog: add/get/list/search/update/delete_product, clear_catalog, reset_catalog, \
                 import_catalog_csv, catalog_template. \
                 Manifest: add_line, list_lines, remove_line, clear_manifest, recalculate_manifest, \
                 paste_manifest, import_manifest_csv, manifest_template, manifest_summary. \
                 Settings: get_settings, set_unit_system, set_pallet. \
                 Units are METRIC (mm/g) or IMPERIAL (in/lb); most tools default to the active system."
                    .into(),
            ),
        }
    }
}
