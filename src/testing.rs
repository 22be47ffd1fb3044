//! Test utilities for database setup.
//!
//! Reuses the real migrations so tests never carry their own copy of the schema.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Migrated palace database in a temporary directory, removed on drop.
pub struct TestEnv {
  /// Kept alive for database file persistence
  pub temp: TempDir,
  pub conn: Connection,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let conn = Connection::open(temp.path().join("palace.db"))?;
    crate::db::schema::run_migrations(&conn)?;

    Ok(Self { temp, conn })
  }

  /// Get the temporary directory path for creating test files.
  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn db_path(&self) -> PathBuf {
    self.temp.path().join("palace.db")
  }
}
