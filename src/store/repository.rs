// Stockroom — Inventory Repository
//
// CRUD and search over product records plus aggregate statistics. Mutations
// are gated on the caller's role, checked here at the operation boundary —
// records carry no per-row permissions. Reads are open to any caller.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::auth::AuthContext;

use super::db::Database;
use super::models::{InventoryStats, Product, ProductFields, ProductOrder};
use super::StoreError;

/// Columns fetched for every product query, in `row_to_product` order.
const PRODUCT_COLUMNS: &str =
    "id, name, sku, description, quantity, price, category, brand, supplier, added_at";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over inventory storage operations.
pub trait InventoryStore {
    /// List every product in the given order.
    fn list_all(&self, order: ProductOrder) -> Result<Vec<Product>, StoreError>;

    /// Case-insensitive substring search across name, supplier, SKU,
    /// category, and brand (OR across fields). An empty or whitespace-only
    /// term returns the full listing, newest first.
    fn search(&self, term: &str) -> Result<Vec<Product>, StoreError>;

    /// Fetch a single product by id.
    fn find(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Create a product. Admin only. Assigns the id and creation timestamp.
    fn create(&self, fields: ProductFields, ctx: &AuthContext) -> Result<Product, StoreError>;

    /// Overwrite every mutable field of an existing product. Admin only.
    /// The id and creation timestamp never change.
    fn update(
        &self,
        id: i64,
        fields: ProductFields,
        ctx: &AuthContext,
    ) -> Result<Product, StoreError>;

    /// Permanently remove a product. Admin only. No soft delete.
    fn delete(&self, id: i64, ctx: &AuthContext) -> Result<(), StoreError>;

    /// Aggregate figures over the whole inventory. All zeros when empty.
    fn statistics(&self) -> Result<InventoryStats, StoreError>;
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteInventoryStore<'a> {
    db: &'a Database,
}

impl<'a> SqliteInventoryStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Parse a product row from the database.
    fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
        let added_at_str: String = row.get(9)?;
        let added_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&added_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    9,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;

        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            sku: row.get(2)?,
            description: row.get(3)?,
            quantity: row.get(4)?,
            price: row.get(5)?,
            category: row.get(6)?,
            brand: row.get(7)?,
            supplier: row.get(8)?,
            added_at,
        })
    }

    /// Fail unless the caller holds the admin role.
    fn require_admin(ctx: &AuthContext) -> Result<(), StoreError> {
        if ctx.is_admin() {
            Ok(())
        } else {
            tracing::debug!(
                username = %ctx.user().username,
                role = %ctx.role(),
                "Mutation denied: admin role required"
            );
            Err(StoreError::Forbidden(ctx.role()))
        }
    }
}

impl<'a> InventoryStore for SqliteInventoryStore<'a> {
    fn list_all(&self, order: ProductOrder) -> Result<Vec<Product>, StoreError> {
        let order_by = match order {
            ProductOrder::NewestFirst => "id DESC",
            ProductOrder::NameAscending => "name ASC",
        };
        let sql = format!("SELECT {} FROM products ORDER BY {}", PRODUCT_COLUMNS, order_by);

        let mut stmt = self.db.conn().prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_product)?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }

        Ok(products)
    }

    fn search(&self, term: &str) -> Result<Vec<Product>, StoreError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_all(ProductOrder::NewestFirst);
        }

        // SQLite LIKE is case-insensitive for ASCII. NULL fields never match.
        let pattern = format!("%{}%", term);
        let sql = format!(
            "SELECT {} FROM products
             WHERE name LIKE ?1 OR supplier LIKE ?1 OR sku LIKE ?1
                OR category LIKE ?1 OR brand LIKE ?1
             ORDER BY id DESC",
            PRODUCT_COLUMNS
        );

        let mut stmt = self.db.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![pattern], Self::row_to_product)?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }

        Ok(products)
    }

    fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let product = self
            .db
            .conn()
            .query_row(&sql, params![id], Self::row_to_product)
            .optional()?;
        Ok(product)
    }

    fn create(&self, fields: ProductFields, ctx: &AuthContext) -> Result<Product, StoreError> {
        Self::require_admin(ctx)?;
        fields.validate()?;

        let added_at = Utc::now();
        self.db.conn().execute(
            "INSERT INTO products
                (name, sku, description, quantity, price, category, brand, supplier, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                fields.name,
                fields.sku,
                fields.description,
                fields.quantity,
                fields.price,
                fields.category,
                fields.brand,
                fields.supplier,
                added_at.to_rfc3339(),
            ],
        )?;

        let id = self.db.conn().last_insert_rowid();

        tracing::info!(
            product_id = id,
            name = %fields.name,
            actor = %ctx.user().username,
            "Product created"
        );

        self.find(id)?.ok_or(StoreError::NotFound(id))
    }

    fn update(
        &self,
        id: i64,
        fields: ProductFields,
        ctx: &AuthContext,
    ) -> Result<Product, StoreError> {
        Self::require_admin(ctx)?;
        fields.validate()?;

        let affected = self.db.conn().execute(
            "UPDATE products
             SET name = ?1, sku = ?2, description = ?3, quantity = ?4,
                 price = ?5, category = ?6, brand = ?7, supplier = ?8
             WHERE id = ?9",
            params![
                fields.name,
                fields.sku,
                fields.description,
                fields.quantity,
                fields.price,
                fields.category,
                fields.brand,
                fields.supplier,
                id,
            ],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::info!(
            product_id = id,
            name = %fields.name,
            actor = %ctx.user().username,
            "Product updated"
        );

        self.find(id)?.ok_or(StoreError::NotFound(id))
    }

    fn delete(&self, id: i64, ctx: &AuthContext) -> Result<(), StoreError> {
        Self::require_admin(ctx)?;

        let affected = self
            .db
            .conn()
            .execute("DELETE FROM products WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::info!(
            product_id = id,
            actor = %ctx.user().username,
            "Product deleted"
        );

        Ok(())
    }

    fn statistics(&self) -> Result<InventoryStats, StoreError> {
        let stats = self.db.conn().query_row(
            "SELECT count(*),
                    COALESCE(SUM(quantity), 0),
                    COALESCE(SUM(price * quantity), 0.0)
             FROM products",
            [],
            |row| {
                Ok(InventoryStats {
                    total_products: row.get(0)?,
                    total_units: row.get(1)?,
                    total_value: row.get(2)?,
                })
            },
        )?;

        Ok(stats)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, User};

    fn admin_ctx() -> AuthContext {
        AuthContext::new(User {
            id: 1,
            username: "admin".to_string(),
            role: Role::Admin,
        })
    }

    fn user_ctx() -> AuthContext {
        AuthContext::new(User {
            id: 2,
            username: "clerk".to_string(),
            role: Role::User,
        })
    }

    fn fields(name: &str, quantity: i64, price: f64) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            quantity,
            price,
            ..Default::default()
        }
    }

    fn full_fields() -> ProductFields {
        ProductFields {
            name: "Laptop".to_string(),
            sku: Some("SKU-001".to_string()),
            description: Some("14-inch ultrabook".to_string()),
            quantity: 3,
            price: 999.99,
            category: Some("Electronics".to_string()),
            brand: Some("Acme".to_string()),
            supplier: Some("Acme Distribution".to_string()),
        }
    }

    #[test]
    fn test_create_assigns_fresh_id_and_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let before = Utc::now();

        let product = store.create(full_fields(), &admin_ctx()).unwrap();

        assert!(product.id > 0);
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.sku.as_deref(), Some("SKU-001"));
        assert_eq!(product.quantity, 3);
        assert_eq!(product.price, 999.99);
        assert!(
            product.added_at >= before - chrono::Duration::seconds(1),
            "Creation timestamp must be stamped at call time"
        );

        let listed = store.list_all(ProductOrder::NewestFirst).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], product);
    }

    #[test]
    fn test_ids_are_monotonically_increasing() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        let a = store.create(fields("A", 1, 1.0), &ctx).unwrap();
        let b = store.create(fields("B", 1, 1.0), &ctx).unwrap();
        let c = store.create(fields("C", 1, 1.0), &ctx).unwrap();

        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_list_all_newest_first_orders_by_id_descending() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        for name in ["First", "Second", "Third"] {
            store.create(fields(name, 1, 1.0), &ctx).unwrap();
        }

        let listed = store.list_all(ProductOrder::NewestFirst).unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[test]
    fn test_list_all_name_ascending_orders_alphabetically() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        for name in ["Monitor", "Cable", "Keyboard"] {
            store.create(fields(name, 1, 1.0), &ctx).unwrap();
        }

        let listed = store.list_all(ProductOrder::NameAscending).unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cable", "Keyboard", "Monitor"]);
    }

    #[test]
    fn test_create_requires_admin() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);

        let err = store.create(full_fields(), &user_ctx()).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(Role::User)));
        assert!(
            store.list_all(ProductOrder::NewestFirst).unwrap().is_empty(),
            "Denied create must not persist anything"
        );
    }

    #[test]
    fn test_non_admin_denied_regardless_of_input_validity() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);

        // Even invalid input fails with Forbidden, not Validation:
        // the role check comes first.
        let err = store.create(fields("", -5, -1.0), &user_ctx()).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = store
            .update(999, fields("", -5, -1.0), &user_ctx())
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = store.delete(999, &user_ctx()).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);

        let err = store.create(fields("", 1, 1.0), &admin_ctx()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_update_overwrites_all_mutable_fields() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        let created = store.create(full_fields(), &ctx).unwrap();

        let updated = store
            .update(
                created.id,
                ProductFields {
                    name: "Laptop Pro".to_string(),
                    sku: Some("SKU-002".to_string()),
                    description: None,
                    quantity: 10,
                    price: 1299.0,
                    category: Some("Electronics".to_string()),
                    brand: Some("Acme".to_string()),
                    supplier: None,
                },
                &ctx,
            )
            .unwrap();

        assert_eq!(updated.id, created.id, "id must never change");
        assert_eq!(
            updated.added_at, created.added_at,
            "creation timestamp must never change"
        );
        assert_eq!(updated.name, "Laptop Pro");
        assert_eq!(updated.sku.as_deref(), Some("SKU-002"));
        assert_eq!(updated.description, None);
        assert_eq!(updated.quantity, 10);
        assert_eq!(updated.price, 1299.0);
        assert_eq!(updated.supplier, None);
    }

    #[test]
    fn test_update_leaves_other_records_untouched() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        let other = store.create(fields("Mouse", 7, 15.0), &ctx).unwrap();
        let target = store.create(fields("Keyboard", 2, 45.0), &ctx).unwrap();

        store
            .update(target.id, fields("Keyboard MkII", 4, 55.0), &ctx)
            .unwrap();

        let untouched = store.find(other.id).unwrap().unwrap();
        assert_eq!(untouched, other);
    }

    #[test]
    fn test_update_nonexistent_id_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);

        let err = store
            .update(42, fields("Ghost", 1, 1.0), &admin_ctx())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(42)));
    }

    #[test]
    fn test_update_rejects_invalid_fields() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        let created = store.create(full_fields(), &ctx).unwrap();

        let err = store
            .update(created.id, fields("Laptop", -1, 1.0), &ctx)
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // The record is unchanged after the rejected update
        let current = store.find(created.id).unwrap().unwrap();
        assert_eq!(current, created);
    }

    #[test]
    fn test_delete_removes_record_permanently() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        let product = store.create(full_fields(), &ctx).unwrap();

        store.delete(product.id, &ctx).unwrap();

        assert!(store.find(product.id).unwrap().is_none());
        assert!(store.list_all(ProductOrder::NewestFirst).unwrap().is_empty());

        // A second delete of the same id fails with NotFound
        let err = store.delete(product.id, &ctx).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_statistics_on_empty_inventory_are_zero() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_units, 0);
        assert_eq!(stats.total_value, 0.0);
    }

    #[test]
    fn test_statistics_aggregate_count_units_and_value() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        store.create(fields("P1", 3, 10.0), &ctx).unwrap();
        store.create(fields("P2", 2, 5.0), &ctx).unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_units, 5);
        assert!((stats.total_value - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_search_is_case_insensitive_substring_match() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        store.create(full_fields(), &ctx).unwrap();
        store.create(fields("Desk Chair", 4, 120.0), &ctx).unwrap();

        let hits = store.search("LAPTOP").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Laptop");

        let hits = store.search("apt").unwrap();
        assert_eq!(hits.len(), 1, "Substring match, not prefix match");
    }

    #[test]
    fn test_search_matches_any_configured_field() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        store.create(full_fields(), &ctx).unwrap();

        // OR across name, supplier, sku, category, and brand
        for term in ["Laptop", "Distribution", "SKU-001", "Electron", "acme"] {
            let hits = store.search(term).unwrap();
            assert_eq!(hits.len(), 1, "Term '{}' should match", term);
        }

        assert!(
            store.search("ultrabook").unwrap().is_empty(),
            "Description is not a searchable field"
        );
        assert!(store.search("nomatch").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_term_equals_list_all() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        for name in ["A", "B", "C"] {
            store.create(fields(name, 1, 1.0), &ctx).unwrap();
        }

        let all = store.list_all(ProductOrder::NewestFirst).unwrap();
        assert_eq!(store.search("").unwrap(), all);
        assert_eq!(store.search("   ").unwrap(), all);
    }

    #[test]
    fn test_search_results_are_subset_of_list_all() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        store.create(fields("Alpha Widget", 1, 1.0), &ctx).unwrap();
        store.create(fields("Beta Widget", 1, 1.0), &ctx).unwrap();
        store.create(fields("Gamma Gadget", 1, 1.0), &ctx).unwrap();

        let all = store.list_all(ProductOrder::NewestFirst).unwrap();
        let hits = store.search("widget").unwrap();

        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert!(all.contains(hit), "Every hit must appear in the listing");
        }
    }

    #[test]
    fn test_full_crud_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteInventoryStore::new(&db);
        let ctx = admin_ctx();

        // Create
        let product = store.create(fields("Widget", 5, 2.5), &ctx).unwrap();

        // Read
        let found = store.find(product.id).unwrap().unwrap();
        assert_eq!(found, product);

        // Update (self-loop on the active state)
        let updated = store
            .update(product.id, fields("Widget v2", 6, 3.0), &ctx)
            .unwrap();
        assert_eq!(updated.name, "Widget v2");

        // Delete (terminal)
        store.delete(product.id, &ctx).unwrap();
        assert!(store.find(product.id).unwrap().is_none());
        assert_eq!(store.statistics().unwrap().total_products, 0);
    }
}
