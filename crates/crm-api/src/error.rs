//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const UNIQUE_VIOLATION: &str = "A record with the same unique key already exists";
pub const FOREIGN_KEY_VIOLATION: &str = "A referenced record does not exist or is still in use";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Crm(#[from] crm_core::Error),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use crm_core::Error as E;

    let (status, body) = match self {
      ApiError::Crm(E::EntityValidation { message, details }) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": message, "details": details }),
      ),
      ApiError::Crm(E::NotFound(m)) | ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, json!({ "error": m }))
      }
      // The raw constraint text was already logged when the error was
      // translated.
      ApiError::Crm(E::UniqueConstraintViolation(_)) => {
        (StatusCode::CONFLICT, json!({ "error": UNIQUE_VIOLATION }))
      }
      ApiError::Crm(E::ForeignKeyConstraintViolation(_)) => {
        (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": FOREIGN_KEY_VIOLATION }))
      }
      ApiError::Crm(E::Store(e)) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": INTERNAL_ERROR }))
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
    };
    (status, Json(body)).into_response()
  }
}

/// Parse a comma-separated list of ids, e.g. `?ids=a,b`.
pub(crate) fn parse_id_list(ids: &str) -> Result<Vec<uuid::Uuid>, ApiError> {
  ids
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| {
      uuid::Uuid::parse_str(s).map_err(|_| ApiError::BadRequest(format!("{s} is not a valid GUID")))
    })
    .collect()
}
