//! # Database State
//!
//! Wraps the `Database` connection for commands that talk to SQLite
//! directly (status and health checks). Ledger commands go through
//! [`super::StoreState`] and never touch the pool themselves.
//!
//! ## Thread Safety
//! The `Database` struct from `verdant-db` contains a `SqlitePool` which
//! is inherently thread-safe.

use verdant_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
