//! Transport-agnostic application state shared by the HTTP API.
//!
//! `CoreState` owns the database location; handlers open short-lived
//! connections per request through `open_db()`.

use std::path::PathBuf;

use thiserror::Error;

use crate::config;
use crate::db::{self, DatabaseError};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct CoreState {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
}

impl CoreState {
    /// CoreState against the configured data directory, creating it
    /// (and running migrations) if needed.
    pub fn new() -> Result<Self, CoreError> {
        Self::at(config::database_path())
    }

    /// CoreState against an explicit database path (tests use a tempdir).
    pub fn at(db_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::MigrationFailed {
                    version: 0,
                    reason: format!("cannot create data dir: {e}"),
                }
            })?;
        }
        // Open once to run migrations eagerly at startup
        db::open_database(&db_path)?;
        Ok(Self { db_path })
    }

    /// Open a database connection. Migrations already ran at startup,
    /// so this is a cheap open + pragma setup.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        Ok(db::open_database(&self.db_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_database_and_opens_connections() {
        let dir = tempfile::tempdir().unwrap();
        let state = CoreState::at(dir.path().join("nested").join("test.db")).unwrap();
        let conn = state.open_db().unwrap();
        let tables = db::count_tables(&conn).unwrap();
        assert!(tables > 0);
    }
}
