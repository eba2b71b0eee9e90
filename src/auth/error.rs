// Stockroom — Auth error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. One variant for both, so the
    /// caller-visible message never reveals which part was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
