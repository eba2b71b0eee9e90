// Stockroom — Auth Module
//
// User accounts, Argon2id password verification, and the authentication
// context that gates inventory mutations.

mod accounts;
mod error;
mod models;
pub mod password;

pub use accounts::{
    SqliteUserStore, UserStore, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
    DEFAULT_USER_PASSWORD, DEFAULT_USER_USERNAME,
};
pub use error::AuthError;
pub use models::{AuthContext, Role, User};
