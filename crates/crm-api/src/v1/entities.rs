//! Handlers for `/entity` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/entity` | Body: `{"entity_nm": "..", "entity_type": "individual"}` |
//! | `GET`    | `/entity/{entity_id}` | 404 if not found |
//! | `GET`    | `/entity/{entity_id}/roles` | |
//! | `POST`   | `/entity/{entity_id}/roles` | Exactly one of `regime_entity_id`, `company_entity_id` |
//! | `DELETE` | `/entity/{entity_id}/roles/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::entity::{Entity, EntityRole},
  services::entities::{self, EntityPayload, EntityRolePayload},
  store::CrmStore,
};
use uuid::Uuid;

use super::Envelope;
use crate::error::ApiError;

/// `POST /entity`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<EntityPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let entity = entities::create_entity(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(Envelope::data(entity))))
}

/// `GET /entity/{entity_id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(entity_id): Path<Uuid>,
) -> Result<Json<Envelope<Entity>>, ApiError>
where
  S: CrmStore,
{
  let entity = entities::get_entity(store.as_ref(), entity_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Entity {entity_id} not found")))?;
  Ok(Json(Envelope::data(entity)))
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// `GET /entity/{entity_id}/roles`
pub async fn list_roles<S>(
  State(store): State<Arc<S>>,
  Path(entity_id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<EntityRole>>>, ApiError>
where
  S: CrmStore,
{
  let roles = entities::get_entity_roles(store.as_ref(), entity_id).await?;
  Ok(Json(Envelope::data(roles)))
}

/// `POST /entity/{entity_id}/roles`
pub async fn create_role<S>(
  State(store): State<Arc<S>>,
  Path(entity_id): Path<Uuid>,
  Json(body): Json<EntityRolePayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let role = entities::create_entity_role(store.as_ref(), entity_id, body).await?;
  Ok((StatusCode::CREATED, Json(Envelope::data(role))))
}

/// `DELETE /entity/{entity_id}/roles/{id}`
pub async fn delete_role<S>(
  State(store): State<Arc<S>>,
  Path((entity_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  if entities::delete_entity_role(store.as_ref(), id).await? {
    tracing::info!(%entity_id, entity_role_id = %id, "entity role deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Entity role {id} not found")))
  }
}
