//! Application configuration constants and config loading.
//!
//! Scheduling constants live here so the scheduler, quiz selector and tests
//! agree on a single set of numbers. Runtime settings are resolved with
//! priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{DirectionPolicy, ReviewFailurePolicy};
use crate::paths;

// ==================== Scheduling ====================

/// Difficulty assigned to new items and assumed when a stored value is missing
pub const DEFAULT_DIFFICULTY: f64 = 2.5;

/// Lower bound for the difficulty factor
pub const MIN_DIFFICULTY: f64 = 1.3;

/// Upper bound for the difficulty factor
pub const MAX_DIFFICULTY: f64 = 3.5;

/// Multiplier applied to difficulty on a successful recall
pub const SUCCESS_FACTOR: f64 = 0.8;

/// Multiplier applied to difficulty on a failed recall
pub const FAILURE_FACTOR: f64 = 1.2;

/// Longest interval the informational schedule will suggest
pub const MAX_INTERVAL_DAYS: f64 = 30.0;

// ==================== Quiz ====================

/// Minimum number of mastered items before review mode is available
pub const MIN_QUIZ_POOL: usize = 4;

/// Number of distractor choices in multiple choice mode
pub const DISTRACTOR_COUNT: usize = 3;

// ==================== Runtime configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
  database: Option<DatabaseSection>,
  review: Option<ReviewSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
  path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReviewSection {
  failure_policy: Option<String>,
  direction: Option<String>,
}

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub database_path: PathBuf,
  pub failure_policy: ReviewFailurePolicy,
  pub direction_policy: DirectionPolicy,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_path: paths::default_db_path(),
      failure_policy: ReviewFailurePolicy::default(),
      direction_policy: DirectionPolicy::default(),
    }
  }
}

/// Parse the contents of a config.toml, logging and discarding malformed files
pub fn parse_config_file(contents: &str) -> Option<ConfigFile> {
  match toml::from_str::<ConfigFile>(contents) {
    Ok(file) => Some(file),
    Err(e) => {
      tracing::warn!("Ignoring malformed config file: {}", e);
      None
    }
  }
}

fn read_config_file(path: &Path) -> Option<ConfigFile> {
  let contents = std::fs::read_to_string(path).ok()?;
  parse_config_file(&contents)
}

/// Combine a parsed config file with environment lookups.
///
/// `env` is injected so precedence can be tested without touching the process
/// environment.
pub fn resolve_config<F>(file: Option<ConfigFile>, env: F) -> AppConfig
where
  F: Fn(&str) -> Option<String>,
{
  let file = file.unwrap_or_default();
  let database = file.database.unwrap_or_default();
  let review = file.review.unwrap_or_default();
  let defaults = AppConfig::default();

  let database_path = match database.path {
    Some(path) => {
      tracing::info!("Using database from config.toml: {}", path);
      PathBuf::from(path)
    }
    None => match env("DATABASE_PATH") {
      Some(path) => {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        PathBuf::from(path)
      }
      None => {
        tracing::info!("Using default database path: {}", defaults.database_path.display());
        defaults.database_path
      }
    },
  };

  let failure_policy = review
    .failure_policy
    .or_else(|| env("REVIEW_FAILURE_POLICY"))
    .and_then(|s| {
      let parsed = ReviewFailurePolicy::from_str(&s);
      if parsed.is_none() {
        tracing::warn!("Unknown review failure policy '{}', using default", s);
      }
      parsed
    })
    .unwrap_or(defaults.failure_policy);

  let direction_policy = review
    .direction
    .or_else(|| env("QUIZ_DIRECTION"))
    .and_then(|s| {
      let parsed = DirectionPolicy::from_str(&s);
      if parsed.is_none() {
        tracing::warn!("Unknown quiz direction '{}', using default", s);
      }
      parsed
    })
    .unwrap_or(defaults.direction_policy);

  AppConfig {
    database_path,
    failure_policy,
    direction_policy,
  }
}

/// Load runtime settings with priority: config.toml > .env > default
pub fn load_config() -> AppConfig {
  // Load .env file if present
  let _ = dotenvy::dotenv();
  let file = read_config_file(Path::new(paths::CONFIG_FILE));
  resolve_config(file, |key| std::env::var(key).ok())
}
