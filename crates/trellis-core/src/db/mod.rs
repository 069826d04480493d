//! Database operations and SQLite management for the item store.
//!
//! This module provides low-level database operations for the Trellis plan
//! store. It handles SQLite connections and schema management, and provides
//! the repository (item CRUD) and tree-engine (subtree walk, count,
//! cascade delete) query interfaces.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod item_queries;
pub mod migrations;
pub mod tree_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
