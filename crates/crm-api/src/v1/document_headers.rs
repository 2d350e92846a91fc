//! Handlers for `/documentHeader` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/documentHeader` | `?filter=<json>&sort=<json>&pagination=<json>` |
//! | `POST`   | `/documentHeader` | Upsert on (`system_id`, `system_internal_id`, `regime_entity_id`) |
//! | `GET`    | `/documentHeader/{id}` | 404 if not found |
//! | `DELETE` | `/documentHeader/{id}` | Returns the deleted row |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  filter::{Pagination, RawDocumentFilter, RawDocumentSort},
  models::document_header::DocumentHeader,
  services::document_headers::{self, DocumentHeaderPayload},
  store::CrmStore,
};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use super::Envelope;
use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

/// Each parameter is a JSON document in a query-string value.
#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub filter:     Option<String>,
  pub sort:       Option<String>,
  pub pagination: Option<String>,
}

fn json_param<T>(name: &str, value: Option<&str>) -> Result<T, ApiError>
where
  T: DeserializeOwned + Default,
{
  match value {
    None => Ok(T::default()),
    Some(raw) => serde_json::from_str(raw)
      .map_err(|e| ApiError::BadRequest(format!("{name} is not valid JSON: {e}"))),
  }
}

/// `GET /documentHeader`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Envelope<Vec<DocumentHeader>>>, ApiError>
where
  S: CrmStore,
{
  let filter: RawDocumentFilter = json_param("filter", params.filter.as_deref())?;
  let sort: RawDocumentSort = json_param("sort", params.sort.as_deref())?;
  let pagination: Pagination = json_param("pagination", params.pagination.as_deref())?;

  let headers =
    document_headers::find_document_headers(store.as_ref(), filter, sort, Some(pagination))
      .await?;
  Ok(Json(Envelope::page(headers, pagination)))
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

/// `POST /documentHeader`
pub async fn upsert<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<DocumentHeaderPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let header = document_headers::upsert_document_header(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(Envelope::data(header))))
}

// ─── Get / delete ────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("Document header {id} not found")) }

/// `GET /documentHeader/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Envelope<DocumentHeader>>, ApiError>
where
  S: CrmStore,
{
  let header = document_headers::get_document_header(store.as_ref(), id)
    .await?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(Envelope::data(header)))
}

/// `DELETE /documentHeader/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Envelope<DocumentHeader>>, ApiError>
where
  S: CrmStore,
{
  let header = document_headers::get_document_header(store.as_ref(), id)
    .await?
    .ok_or_else(|| not_found(id))?;
  if !document_headers::delete_document_header(store.as_ref(), id).await? {
    return Err(not_found(id));
  }
  tracing::info!(document_id = %id, "document header deleted");
  Ok(Json(Envelope::data(header)))
}
