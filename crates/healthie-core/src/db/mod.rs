//! SQLite key-value storage.
//!
//! The database holds a single table of string keys to JSON text. Higher
//! level persistence (encoding plans, discarding unreadable entries) lives
//! in [`crate::store`].

use std::path::Path;

use rusqlite::Connection;

use crate::error::{Result, StorageResultExt};

pub mod kv_queries;
pub mod migrations;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens the database and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).storage_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// An in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()
            .storage_context("Failed to open in-memory database")?;
        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
