//! Catalog MCP Tools
//!
//! Tools for managing the product catalog. Products are stored in METRIC; every
//! tool here accepts and reports values in whatever system the caller asks for.

use serde::Serialize;

use crate::db::seed::{self, CATALOG_VERSION};
use crate::db::Database;
use crate::models::{BoxConfig, Product, ProductCreate, ProductUpdate};
use crate::units::{Length, UnitSystem, Weight};
use super::import::{self, TemplateResponse, CATALOG_HEADER};

const STORED: UnitSystem = UnitSystem::Metric;

/// Response for add_product
#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// A product expressed in a requested unit system
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub unit_system: UnitSystem,
    pub items_per_box: u32,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub gross_weight: f64,
    pub length_unit: &'static str,
    pub weight_unit: &'static str,
}

impl ProductSummary {
    pub fn from_product(product: &Product, system: UnitSystem) -> Self {
        let b = product.box_config.convert(STORED, system);
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_system: system,
            items_per_box: b.items_per_box,
            length: b.dimensions.length,
            width: b.dimensions.width,
            height: b.dimensions.height,
            gross_weight: b.gross_weight,
            length_unit: system.length_label(),
            weight_unit: system.weight_label(),
        }
    }
}

/// Response for list_products
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub items: Vec<ProductSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for search_products
#[derive(Debug, Serialize)]
pub struct SearchProductsResponse {
    pub items: Vec<ProductSummary>,
    pub total: usize,
}

/// Response for update_product
#[derive(Debug, Serialize)]
pub struct UpdateProductResponse {
    pub success: bool,
    pub product: ProductSummary,
    pub updated_at: String,
}

/// Response for delete_product
#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// Response for clear_catalog and reset_catalog
#[derive(Debug, Serialize)]
pub struct CatalogCountResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

/// Response for import_catalog_csv
#[derive(Debug, Serialize)]
pub struct ImportCatalogResponse {
    pub success: bool,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub message: String,
}

/// New product values, in `unit_system`
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub id: Option<String>,
    pub name: String,
    pub box_config: BoxConfig,
    pub unit_system: UnitSystem,
}

/// Partial product changes, in `unit_system`
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub items_per_box: Option<u32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub gross_weight: Option<f64>,
    pub unit_system: UnitSystem,
}

fn validate(name: &str, items_per_box: u32) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Product name is required".to_string());
    }
    if items_per_box < 1 {
        return Err("items_per_box must be at least 1".to_string());
    }
    Ok(())
}

/// Add a product to the catalog
pub fn add_product(db: &Database, input: ProductInput) -> Result<AddProductResponse, String> {
    validate(&input.name, input.box_config.items_per_box)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if let Some(id) = input.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        let existing = Product::get_by_id(&conn, id).map_err(|e| format!("Database error: {}", e))?;
        if existing.is_some() {
            return Err(format!("Product already exists: {}", id));
        }
    }

    let data = ProductCreate {
        id: input.id,
        name: input.name.trim().to_string(),
        box_config: input.box_config.convert(input.unit_system, STORED),
    };

    let product = Product::create(&conn, &data).map_err(|e| format!("Failed to create product: {}", e))?;

    Ok(AddProductResponse {
        id: product.id,
        name: product.name,
        created_at: product.created_at,
    })
}

/// Get a product by ID
pub fn get_product(db: &Database, id: &str, system: UnitSystem) -> Result<Option<ProductSummary>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::get_by_id(&conn, id).map_err(|e| format!("Database error: {}", e))?;

    Ok(product.as_ref().map(|p| ProductSummary::from_product(p, system)))
}

/// List products with pagination
pub fn list_products(
    db: &Database,
    system: UnitSystem,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<ListProductsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let limit = limit.unwrap_or(100).clamp(1, 1000);
    let offset = offset.unwrap_or(0).max(0);

    let products = Product::list(&conn, limit, offset).map_err(|e| format!("Database error: {}", e))?;
    let total = Product::count(&conn).map_err(|e| format!("Database error: {}", e))?;

    Ok(ListProductsResponse {
        items: products.iter().map(|p| ProductSummary::from_product(p, system)).collect(),
        total,
        limit,
        offset,
    })
}

/// Search products by name or id
pub fn search_products(
    db: &Database,
    query: &str,
    system: UnitSystem,
    limit: Option<i64>,
) -> Result<SearchProductsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let limit = limit.unwrap_or(20).clamp(1, 200);
    let products = Product::search(&conn, query, limit).map_err(|e| format!("Database error: {}", e))?;

    let items: Vec<ProductSummary> = products.iter().map(|p| ProductSummary::from_product(p, system)).collect();
    let total = items.len();

    Ok(SearchProductsResponse { items, total })
}

/// Update a product; values in the patch are converted to METRIC before storing
pub fn update_product(db: &Database, id: &str, patch: ProductPatch) -> Result<UpdateProductResponse, String> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
    }
    if patch.items_per_box == Some(0) {
        return Err("items_per_box must be at least 1".to_string());
    }

    let system = patch.unit_system;
    let to_mm = |v: f64| Length::new(v, system).to(STORED).value;

    let update = ProductUpdate {
        name: patch.name.map(|n| n.trim().to_string()),
        items_per_box: patch.items_per_box,
        length_mm: patch.length.map(to_mm),
        width_mm: patch.width.map(to_mm),
        height_mm: patch.height.map(to_mm),
        gross_weight_g: patch.gross_weight.map(|v| Weight::new(v, system).to(STORED).value),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::update(&conn, id, &update)
        .map_err(|e| format!("Failed to update product: {}", e))?
        .ok_or_else(|| format!("Product not found: {}", id))?;

    Ok(UpdateProductResponse {
        success: true,
        updated_at: product.updated_at.clone(),
        product: ProductSummary::from_product(&product, system),
    })
}

/// Delete a product; manifest lines keep their own box snapshot
pub fn delete_product(db: &Database, id: &str) -> Result<DeleteProductResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Product::delete(&conn, id).map_err(|e| format!("Database error: {}", e))?;
    if !deleted {
        return Err(format!("Product not found: {}", id));
    }

    Ok(DeleteProductResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

/// Remove every product
pub fn clear_catalog(db: &Database) -> Result<CatalogCountResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let count = Product::delete_all(&conn).map_err(|e| format!("Database error: {}", e))?;
    tracing::info!(removed = count, "Cleared catalog");

    Ok(CatalogCountResponse {
        success: true,
        count,
        message: format!("Removed {} products", count),
    })
}

/// Replace the catalog with the bundled default list
pub fn reset_catalog(db: &Database) -> Result<CatalogCountResponse, String> {
    let count = db
        .with_transaction(|tx| seed::reset_catalog(tx))
        .map_err(|e| format!("Failed to reset catalog: {}", e))?;
    tracing::info!(products = count, version = CATALOG_VERSION, "Reset catalog to defaults");

    Ok(CatalogCountResponse {
        success: true,
        count,
        message: format!("Loaded {} default products (catalog version {})", count, CATALOG_VERSION),
    })
}

/// Import products from CSV text given in `system`
pub fn import_catalog_csv(db: &Database, text: &str, system: UnitSystem) -> Result<ImportCatalogResponse, String> {
    let parsed = import::parse_catalog_csv(text);

    for error in &parsed.errors {
        tracing::warn!(%error, "Skipped catalog row");
    }

    let imported = db
        .with_transaction(|tx| {
            for row in &parsed.rows {
                let data = ProductCreate {
                    id: None,
                    name: row.name.clone(),
                    box_config: row.box_config.convert(system, STORED),
                };
                Product::create(tx, &data)?;
            }
            Ok(parsed.rows.len())
        })
        .map_err(|e| format!("Failed to import catalog: {}", e))?;

    tracing::info!(imported, skipped = parsed.errors.len(), %system, "Imported catalog CSV");

    Ok(ImportCatalogResponse {
        success: imported > 0,
        total_rows: parsed.total_rows,
        imported,
        skipped: parsed.errors.len(),
        message: if imported > 0 {
            format!("Imported {} products", imported)
        } else {
            "No valid products found in CSV".to_string()
        },
        errors: parsed.errors,
    })
}

/// CSV header plus one example row in `system`
pub fn catalog_template(system: UnitSystem) -> TemplateResponse {
    let example = match system {
        UnitSystem::Metric => "Example Widget,12,600,400,300,15000",
        UnitSystem::Imperial => "Example Widget,12,24,16,12,33",
    };
    TemplateResponse {
        filename: format!("catalog_template_{}.csv", system.as_str().to_lowercase()),
        content: format!("{}\n{}", CATALOG_HEADER, example),
    }
}
