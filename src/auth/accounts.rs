// Stockroom — Credential Store
//
// Manages user accounts: first-run seeding, credential verification, and
// role lookup. The password hash never leaves this module — verification
// returns the bare `User` identity on success.

use rusqlite::{params, OptionalExtension};

use crate::store::Database;

use super::password::{hash_password, verify_password};
use super::{AuthError, Role, User};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Username of the seeded administrator account.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Default password of the seeded administrator account.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Username of the seeded regular account.
pub const DEFAULT_USER_USERNAME: &str = "user";

/// Default password of the seeded regular account.
pub const DEFAULT_USER_PASSWORD: &str = "user123";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over user-account storage and credential verification.
pub trait UserStore {
    /// Create the two default accounts (one admin, one regular user) if and
    /// only if the store holds zero users. Idempotent: once any user exists
    /// this is a no-op and never duplicates.
    fn seed_default_accounts(&self) -> Result<(), AuthError>;

    /// Verify a username/password pair. Returns the user (with role) on
    /// success; unknown username and wrong password both fail with
    /// `AuthError::InvalidCredentials`.
    fn verify_credentials(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Look up a user by exact username match (no credential check).
    fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    /// Number of user records in the store.
    fn user_count(&self) -> Result<i64, AuthError>;
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteUserStore<'a> {
    db: &'a Database,
}

impl<'a> SqliteUserStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn insert_user(&self, username: &str, password: &str, role: Role) -> Result<(), AuthError> {
        let password_hash = hash_password(password)?;
        self.db.conn().execute(
            "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role.as_str()],
        )?;
        Ok(())
    }

    /// Parse a user row (id, username, role).
    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let id: i64 = row.get(0)?;
        let username: String = row.get(1)?;
        let role_str: String = row.get(2)?;

        let role = Role::parse(&role_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown role '{}'", role_str).into(),
            )
        })?;

        Ok(User { id, username, role })
    }
}

impl<'a> UserStore for SqliteUserStore<'a> {
    fn seed_default_accounts(&self) -> Result<(), AuthError> {
        if self.user_count()? > 0 {
            tracing::debug!("User store already populated — skipping seeding");
            return Ok(());
        }

        self.insert_user(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD, Role::Admin)?;
        self.insert_user(DEFAULT_USER_USERNAME, DEFAULT_USER_PASSWORD, Role::User)?;

        tracing::warn!(
            admin = DEFAULT_ADMIN_USERNAME,
            user = DEFAULT_USER_USERNAME,
            "Seeded default accounts with well-known passwords — change them"
        );

        Ok(())
    }

    fn verify_credentials(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let row: Option<(i64, String, String)> = self
            .db
            .conn()
            .query_row(
                "SELECT id, password_hash, role FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let (id, stored_hash, role_str) = match row {
            Some(r) => r,
            None => {
                // Responds faster than the wrong-password path; accepted
                // timing trade-off for this core.
                tracing::debug!(username = %username, "Login failed: unknown username");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &stored_hash)? {
            tracing::debug!(username = %username, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let role = Role::parse(&role_str)
            .ok_or_else(|| AuthError::Hash(format!("unknown role '{}' in database", role_str)))?;

        tracing::info!(username = %username, role = %role, "Login succeeded");

        Ok(User {
            id,
            username: username.to_string(),
            role,
        })
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = self
            .db
            .conn()
            .query_row(
                "SELECT id, username, role FROM users WHERE username = ?1",
                params![username],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn user_count(&self) -> Result<i64, AuthError> {
        let count: i64 =
            self.db
                .conn()
                .query_row("SELECT count(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
