// Stockroom — Store error types

use thiserror::Error;

use crate::auth::Role;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Operation requires the admin role (caller role: {0})")]
    Forbidden(Role),

    #[error("{0}")]
    Other(String),
}
