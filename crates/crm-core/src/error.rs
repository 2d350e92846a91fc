//! Error types for `crm-core`.
//!
//! [`Error`] is the closed set of failures a service can report. Storage
//! backends keep their own error types; they cross into this one either
//! through [`translate_write_error`] (after a write) or [`Error::store`].

use serde::Serialize;
use thiserror::Error;

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
  /// Field name as it appears in the request payload.
  pub path:    String,
  pub message: String,
}

impl ValidationDetail {
  pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// Input failed validation or names an entity that does not exist.
  #[error("{message}")]
  EntityValidation {
    message: String,
    details: Vec<ValidationDetail>,
  },

  /// A parent entity required by a dependent lookup does not exist.
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  UniqueConstraintViolation(String),

  #[error("{0}")]
  ForeignKeyConstraintViolation(String),

  /// Anything unrecognised, passed through untouched.
  #[error(transparent)]
  Store(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// An `EntityValidation` error without field details.
  pub fn validation(message: impl Into<String>) -> Self {
    Self::EntityValidation { message: message.into(), details: Vec::new() }
  }

  /// Wrap a storage error without inspecting it.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Constraint signals ──────────────────────────────────────────────────────

/// Implemented by storage backend errors so that services can classify
/// constraint violations without knowing the backend.
pub trait StorageError: std::error::Error + Send + Sync + 'static {
  /// The SQLSTATE class-23 code for a constraint violation, if this error is
  /// one.
  fn sqlstate(&self) -> Option<&str>;
}

/// The constraint violations services know how to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
  Unique,
  ForeignKey,
}

impl ConstraintViolation {
  pub const UNIQUE_SQLSTATE: &'static str = "23505";
  pub const FOREIGN_KEY_SQLSTATE: &'static str = "23503";

  pub fn from_sqlstate(code: &str) -> Option<Self> {
    match code {
      Self::UNIQUE_SQLSTATE => Some(Self::Unique),
      Self::FOREIGN_KEY_SQLSTATE => Some(Self::ForeignKey),
      _ => None,
    }
  }
}

/// Classify the error returned by a repository write.
///
/// Unique and foreign-key violations become their domain variants; every
/// other error is wrapped in [`Error::Store`] with its message intact.
pub fn translate_write_error<E: StorageError>(err: E) -> Error {
  match err.sqlstate().and_then(ConstraintViolation::from_sqlstate) {
    Some(ConstraintViolation::Unique) => {
      tracing::warn!(error = %err, "unique constraint violation");
      Error::UniqueConstraintViolation(err.to_string())
    }
    Some(ConstraintViolation::ForeignKey) => {
      tracing::warn!(error = %err, "foreign key constraint violation");
      Error::ForeignKeyConstraintViolation(err.to_string())
    }
    None => Error::store(err),
  }
}
