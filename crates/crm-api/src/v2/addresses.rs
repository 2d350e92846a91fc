//! Handlers for `/addresses` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::address::Address,
  services::addresses::{self, AddressPayload},
  store::CrmStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `POST /addresses`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<AddressPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let address = addresses::create_address(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(address)))
}

/// `GET /addresses/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Address>, ApiError>
where
  S: CrmStore,
{
  let address = addresses::get_address(store.as_ref(), id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Address not found {id}")))?;
  Ok(Json(address))
}

/// `DELETE /addresses/{id}`; 422 while anything still refers to it.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  if addresses::delete_address(store.as_ref(), id).await? {
    tracing::info!(address_id = %id, "address deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Address not found {id}")))
  }
}
