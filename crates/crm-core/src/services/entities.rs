//! Entities and entity roles.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  error::translate_write_error,
  models::entity::{
    Entity, EntityRole, EntityType, NewEntity, NewEntityRole, RoleScope,
  },
  store::{EntityRepository, EntityRoleRepository},
  validate::Validator,
};

/// Body of `POST /entity`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityPayload {
  pub entity_nm:   Option<String>,
  pub entity_type: Option<String>,
}

impl EntityPayload {
  pub fn validate(self) -> Result<NewEntity> {
    let mut v = Validator::default();
    let entity_nm = v.required_string("entity_nm", self.entity_nm);
    let entity_type: EntityType = match self.entity_type.as_deref() {
      Some(t) => v.one_of("entity_type", t),
      None => {
        v.reject("entity_type", "is required");
        EntityType::default()
      }
    };
    if entity_type == EntityType::Individual && !entity_nm.is_empty() {
      v.email("entity_nm", &entity_nm);
    }
    v.finish("Entity not valid")?;
    Ok(NewEntity { entity_nm, entity_type })
  }
}

/// Body of `POST /entity/{entity_id}/roles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRolePayload {
  pub role:              Option<String>,
  pub regime_entity_id:  Option<String>,
  pub company_entity_id: Option<String>,
  pub permissions:       Option<serde_json::Value>,
  pub created_by:        Option<String>,
}

impl EntityRolePayload {
  pub fn validate(self, entity_id: Uuid) -> Result<NewEntityRole> {
    let mut v = Validator::default();
    let role = v.required_string("role", self.role);
    let regime = v.optional_guid("regime_entity_id", self.regime_entity_id.as_deref());
    let company = v.optional_guid("company_entity_id", self.company_entity_id.as_deref());
    let scope = match (regime, company) {
      (Some(_), Some(_)) => {
        v.reject("company_entity_id", "cannot be set together with regime_entity_id");
        None
      }
      (regime, company) => RoleScope::from_columns(regime, company),
    };
    if scope.is_none() && v.is_valid() {
      v.reject("regime_entity_id", "one of regime_entity_id or company_entity_id is required");
    }
    v.finish("Entity role not valid")?;
    let Some(scope) = scope else {
      return Err(Error::validation("Entity role not valid"));
    };
    Ok(NewEntityRole {
      entity_id,
      role,
      scope,
      permissions: self.permissions.unwrap_or_else(|| serde_json::json!({})),
      created_by: self.created_by,
    })
  }
}

pub async fn create_entity<S>(store: &S, payload: EntityPayload) -> Result<Entity>
where
  S: EntityRepository,
{
  let entity = store
    .create_entity(payload.validate()?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(entity_id = %entity.entity_id, entity_type = entity.entity_type.as_ref(), "entity created");
  Ok(entity)
}

pub async fn get_entity<S>(store: &S, entity_id: Uuid) -> Result<Option<Entity>>
where
  S: EntityRepository,
{
  store.find_entity(entity_id).await.map_err(Error::store)
}

pub async fn create_entity_role<S>(
  store: &S,
  entity_id: Uuid,
  payload: EntityRolePayload,
) -> Result<EntityRole>
where
  S: EntityRoleRepository,
{
  let role = store
    .create_entity_role(payload.validate(entity_id)?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(%entity_id, entity_role_id = %role.entity_role_id, role = %role.role, "entity role created");
  Ok(role)
}

pub async fn get_entity_roles<S>(store: &S, entity_id: Uuid) -> Result<Vec<EntityRole>>
where
  S: EntityRoleRepository,
{
  store
    .find_roles_for_entity(entity_id)
    .await
    .map_err(Error::store)
}

pub async fn delete_entity_role<S>(store: &S, entity_role_id: Uuid) -> Result<bool>
where
  S: EntityRoleRepository,
{
  store
    .delete_entity_role(entity_role_id)
    .await
    .map_err(translate_write_error)
}
