// Stockroom — Library root
//
// Re-exports the auth, store, and CLI modules.

pub mod auth;
pub mod cli;
pub mod error;
pub mod store;

pub use error::{AppError, Result};
