//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | `?ids=<id>,<id>`; unknown ids are skipped |
//! | `POST`   | `/contacts` | Body: [`ContactPayload`]; `lastName` required |
//! | `GET`    | `/contacts/{id}` | 404 if not found |
//! | `DELETE` | `/contacts/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::contact::Contact,
  services::contacts::{self, ContactPayload},
  store::CrmStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, parse_id_list};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub ids: String,
}

/// `GET /contacts?ids=`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: CrmStore,
{
  let ids = parse_id_list(&params.ids)?;
  Ok(Json(contacts::get_contacts_by_ids(store.as_ref(), ids).await?))
}

/// `POST /contacts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let contact = contacts::create_contact(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(contact)))
}

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError>
where
  S: CrmStore,
{
  let contact = contacts::get_contact(store.as_ref(), id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Contact not found {id}")))?;
  Ok(Json(contact))
}

/// `DELETE /contacts/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  if contacts::delete_contact(store.as_ref(), id).await? {
    tracing::info!(contact_id = %id, "contact deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Contact not found {id}")))
  }
}
