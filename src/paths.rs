//! Project path functions - single source of truth for file locations.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! This allows keeping several independent palaces side by side:
//! ```bash
//! DATA_DIR=data/russian cargo run
//! DATA_DIR=data/korean cargo run
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
  DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Default SQLite database path
pub fn default_db_path() -> PathBuf {
  PathBuf::from(format!("{}/palace.db", data_dir()))
}

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "config.toml";
