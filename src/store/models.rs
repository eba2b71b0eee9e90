// Stockroom — Product data models
//
// Plain data structs, deliberately decoupled from persistence: the store
// interface in `repository.rs` is the only thing that talks SQL. `Product`
// is the saved record; `ProductFields` is the caller-supplied input for
// both create and update.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// A saved inventory record.
/// `id` and `added_at` are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub supplier: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} — qty {} @ {:.2}",
            self.id, self.name, self.quantity, self.price
        )
    }
}

/// Caller-supplied fields for creating or updating a product.
///
/// The same struct serves both paths because an update overwrites every
/// mutable field in place.
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub supplier: Option<String>,
}

impl ProductFields {
    /// Check the invariants a saved product must satisfy:
    /// non-empty name, quantity >= 0, price >= 0.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation("product name is required".into()));
        }
        if self.quantity < 0 {
            return Err(StoreError::Validation(format!(
                "quantity must be non-negative (got {})",
                self.quantity
            )));
        }
        if self.price < 0.0 {
            return Err(StoreError::Validation(format!(
                "price must be non-negative (got {})",
                self.price
            )));
        }
        Ok(())
    }
}

/// Ordering for full listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrder {
    /// Most recently added first (id descending). The dashboard default.
    #[default]
    NewestFirst,
    /// Alphabetical by name. Used when populating an edit-selection list.
    NameAscending,
}

/// Aggregate inventory figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InventoryStats {
    /// Number of product records.
    pub total_products: i64,
    /// Sum of quantity over all records.
    pub total_units: i64,
    /// Sum of price × quantity over all records.
    pub total_value: f64,
}

impl fmt::Display for InventoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} products, {} units, total value {:.2}",
            self.total_products, self.total_units, self.total_value
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
