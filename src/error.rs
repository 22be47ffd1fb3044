//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Referenced item id does not exist; nothing was written.
  #[error("item {0} not found")]
  NotFound(i64),

  /// Not enough mastered items to build a multiple-choice round.
  #[error("at least {required} mastered items are required for a quiz, found {available}")]
  InsufficientPool { required: usize, available: usize },

  /// Rejected at the store boundary (empty source or target text, etc.)
  #[error("invalid field `{field}`: {reason}")]
  InvalidField { field: &'static str, reason: String },

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),
}

impl Error {
  pub(crate) fn empty_field(field: &'static str) -> Self {
    Self::InvalidField {
      field,
      reason: "must not be empty".to_string(),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insufficient_pool_message_names_requirement() {
    let err = Error::InsufficientPool { required: 4, available: 2 };
    assert_eq!(
      err.to_string(),
      "at least 4 mastered items are required for a quiz, found 2"
    );
  }

  #[test]
  fn test_empty_field_helper() {
    match Error::empty_field("source_text") {
      Error::InvalidField { field, reason } => {
        assert_eq!(field, "source_text");
        assert_eq!(reason, "must not be empty");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn test_database_error_converts() {
    let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, Error::Database(_)));
  }
}
