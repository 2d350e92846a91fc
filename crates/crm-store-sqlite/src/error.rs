//! Error type for `crm-store-sqlite`.

use crm_core::error::StorageError;
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value that does not decode into its domain type.
  #[error("invalid value in column {column}: {value:?}")]
  InvalidColumn {
    column: &'static str,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StorageError for Error {
  /// SQLite reports constraint failures through extended result codes; map
  /// them onto the SQLSTATE codes services understand.
  fn sqlstate(&self) -> Option<&str> {
    let Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(failure, _),
    )) = self
    else {
      return None;
    };
    match failure.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some("23505"),
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some("23503"),
      ffi::SQLITE_CONSTRAINT_CHECK => Some("23514"),
      ffi::SQLITE_CONSTRAINT_NOTNULL => Some("23502"),
      _ => None,
    }
  }
}
