// Stockroom — SQLite Database Management
//
// Opens and initializes the inventory database. Migrations are idempotent
// and run on every open, so a fresh file and an existing one take the
// same code path.

use std::path::Path;

use rusqlite::Connection;

use super::StoreError;

/// Wrapper around the SQLite connection backing the inventory.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run schema migrations to create or update tables.
    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                username        TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                role            TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS products (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                sku             TEXT,
                description     TEXT,
                quantity        INTEGER NOT NULL DEFAULT 0,
                price           REAL NOT NULL DEFAULT 0.0,
                category        TEXT,
                brand           TEXT,
                supplier        TEXT,
                added_at        TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_products_name
                ON products(name);
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
