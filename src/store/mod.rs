// Stockroom — Store Module
//
// Product records in SQLite: CRUD, search, and aggregate statistics.
// Mutations are role-gated at the operation boundary via `AuthContext`.

mod db;
mod error;
mod models;
mod repository;

pub use db::Database;
pub use error::StoreError;
pub use models::{InventoryStats, Product, ProductFields, ProductOrder};
pub use repository::{InventoryStore, SqliteInventoryStore};
