//! Handlers for `/roles` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::role::Role,
  services::roles::{self, RolePayload},
  store::CrmStore,
};

use crate::error::ApiError;

/// `POST /roles`, body `{"name":"billing"}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RolePayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let role = roles::create_role(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(role)))
}

/// `GET /roles/{name}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Role>, ApiError>
where
  S: CrmStore,
{
  let role = roles::get_role_by_name(store.as_ref(), &name)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Role with name: {name} not found")))?;
  Ok(Json(role))
}
