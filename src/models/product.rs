//! Product model
//!
//! A catalog entry describing one master carton type. Products are always
//! stored in METRIC (mm, g); callers convert at the edges.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{BoxConfig, Dimensions};

/// A catalog product with its carton definition (METRIC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub box_config: BoxConfig,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new product (METRIC)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    /// Explicit catalog id (SKU); generated when absent
    pub id: Option<String>,
    pub name: String,
    pub box_config: BoxConfig,
}

/// Data for updating a product (METRIC)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub items_per_box: Option<u32>,
    pub length_mm: Option<f64>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub gross_weight_g: Option<f64>,
}

impl Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            box_config: BoxConfig {
                items_per_box: row.get("items_per_box")?,
                dimensions: Dimensions {
                    length: row.get("length_mm")?,
                    width: row.get("width_mm")?,
                    height: row.get("height_mm")?,
                },
                gross_weight: row.get("gross_weight_g")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Generate a catalog id unique within this store
    fn generate_id(conn: &Connection) -> DbResult<String> {
        let seq: i64 = conn.query_row("SELECT COUNT(*) + 1 FROM products", [], |row| row.get(0))?;
        Ok(format!("{}-{}", chrono::Utc::now().timestamp_millis(), seq))
    }

    /// Insert a new product into the database
    pub fn create(conn: &Connection, data: &ProductCreate) -> DbResult<Self> {
        let id = match &data.id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => Self::generate_id(conn)?,
        };

        let b = &data.box_config;
        conn.execute(
            r#"
            INSERT INTO products (
                id, name, items_per_box, length_mm, width_mm, height_mm, gross_weight_g
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                id,
                data.name,
                b.items_per_box,
                b.dimensions.length,
                b.dimensions.width,
                b.dimensions.height,
                b.gross_weight,
            ],
        )?;

        Self::get_by_id(conn, &id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a product by ID
    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Exact, case-insensitive name lookup (used by paste import)
    pub fn find_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM products WHERE name = ?1 COLLATE NOCASE ORDER BY created_at, id LIMIT 1",
        )?;

        match stmt.query_row([name.trim()], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search products by name or id
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query.trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM products
            WHERE name LIKE ?1 OR id LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// List products, sorted by name, with pagination
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM products ORDER BY name ASC LIMIT ?1 OFFSET ?2")?;

        let items = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update a product
    ///
    /// Existing shipment lines keep their own box snapshot and are not touched.
    pub fn update(conn: &Connection, id: &str, data: &ProductUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(items_per_box, "items_per_box");
        add_update!(length_mm, "length_mm");
        add_update!(width_mm, "width_mm");
        add_update!(height_mm, "height_mm");
        add_update!(gross_weight_g, "gross_weight_g");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE products SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id.to_string()));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a product. Returns Ok(false) if not found.
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Remove every product; returns the number removed
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM products", [])?)
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

    fn carton() -> BoxConfig {
        BoxConfig {
            items_per_box: 500,
            dimensions: Dimensions::new(315.0, 415.0, 315.0),
            gross_weight: 11850.0,
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let p = Product::create(
            &conn,
            &ProductCreate { id: Some("LAC180".into()), name: "LAC180".into(), box_config: carton() },
        )
        .unwrap();

        assert_eq!(p.id, "LAC180");
        assert_eq!(p.box_config, carton());
        assert_eq!(Product::get_by_id(&conn, "LAC180").unwrap(), Some(p));
        assert_eq!(Product::get_by_id(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let conn = setup();
        let a = Product::create(&conn, &ProductCreate { id: None, name: "A".into(), box_config: carton() }).unwrap();
        let b = Product::create(&conn, &ProductCreate { id: None, name: "B".into(), box_config: carton() }).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(Product::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let conn = setup();
        Product::create(&conn, &ProductCreate { id: None, name: "Widget A".into(), box_config: carton() }).unwrap();

        assert!(Product::find_by_name(&conn, "widget a").unwrap().is_some());
        assert!(Product::find_by_name(&conn, "  WIDGET A ").unwrap().is_some());
        assert!(Product::find_by_name(&conn, "widget").unwrap().is_none());
    }

    #[test]
    fn test_search_and_list() {
        let conn = setup();
        for name in ["LSC101A", "LSC102A", "MAC105A"] {
            Product::create(&conn, &ProductCreate { id: Some(name.into()), name: name.into(), box_config: carton() }).unwrap();
        }

        let found = Product::search(&conn, "lsc", 10).unwrap();
        assert_eq!(found.len(), 2);

        let page = Product::list(&conn, 2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "LSC102A");
    }

    #[test]
    fn test_update_partial() {
        let conn = setup();
        Product::create(&conn, &ProductCreate { id: Some("X".into()), name: "X".into(), box_config: carton() }).unwrap();

        let updated = Product::update(
            &conn,
            "X",
            &ProductUpdate { items_per_box: Some(250), height_mm: Some(265.0), ..Default::default() },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.box_config.items_per_box, 250);
        assert_eq!(updated.box_config.dimensions.height, 265.0);
        assert_eq!(updated.box_config.dimensions.length, 315.0);

        assert!(Product::update(&conn, "nope", &ProductUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let conn = setup();
        Product::create(&conn, &ProductCreate { id: Some("X".into()), name: "X".into(), box_config: carton() }).unwrap();
        assert!(Product::delete(&conn, "X").unwrap());
        assert!(!Product::delete(&conn, "X").unwrap());
    }
}
