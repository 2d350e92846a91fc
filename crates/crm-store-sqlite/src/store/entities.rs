//! `entity` and `entity_roles`.

use chrono::Utc;
use crm_core::{
  models::entity::{Entity, EntityRole, EntityType, NewEntity, NewEntityRole},
  store::{EntityRepository, EntityRoleRepository},
};
use uuid::Uuid;

use super::SqliteStore;
use crate::{
  Result,
  encode::{RawEntity, RawEntityRole, encode_dt, encode_json, encode_uuid, qualified},
  schema::UNICODE_LOWER,
};

impl EntityRepository for SqliteStore {
  async fn create_entity(&self, entity: NewEntity) -> Result<Entity> {
    let entity = Entity {
      entity_id:   Uuid::new_v4(),
      entity_nm:   entity.entity_nm,
      entity_type: entity.entity_type,
      created_at:  Utc::now(),
    };

    self
      .execute(
        "INSERT INTO entity (entity_id, entity_nm, entity_type, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          encode_uuid(entity.entity_id).into(),
          entity.entity_nm.clone().into(),
          entity.entity_type.as_ref().to_owned().into(),
          encode_dt(entity.created_at).into(),
        ],
      )
      .await?;

    Ok(entity)
  }

  async fn find_entity(&self, entity_id: Uuid) -> Result<Option<Entity>> {
    self
      .fetch_one(
        format!(
          "SELECT {} FROM entity WHERE entity_id = ?1",
          RawEntity::COLUMNS.join(", ")
        ),
        vec![encode_uuid(entity_id).into()],
        |row| RawEntity::read(row, 0),
      )
      .await?
      .map(RawEntity::into_entity)
      .transpose()
  }
}

impl EntityRoleRepository for SqliteStore {
  async fn create_entity_role(&self, role: NewEntityRole) -> Result<EntityRole> {
    let role = EntityRole {
      entity_role_id: Uuid::new_v4(),
      entity_id:      role.entity_id,
      role:           role.role,
      scope:          role.scope,
      permissions:    role.permissions,
      created_at:     Utc::now(),
      created_by:     role.created_by,
    };
    let (regime_entity_id, company_entity_id) = role.scope.columns();

    self
      .execute(
        "INSERT INTO entity_roles
           (entity_role_id, entity_id, role, regime_entity_id, company_entity_id,
            permissions, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        vec![
          encode_uuid(role.entity_role_id).into(),
          encode_uuid(role.entity_id).into(),
          role.role.clone().into(),
          regime_entity_id.map(encode_uuid).into(),
          company_entity_id.map(encode_uuid).into(),
          encode_json(&role.permissions)?.into(),
          encode_dt(role.created_at).into(),
          role.created_by.clone().into(),
        ],
      )
      .await?;

    Ok(role)
  }

  async fn find_roles_for_email(&self, email: &str) -> Result<Vec<EntityRole>> {
    self
      .fetch(
        format!(
          "SELECT {cols} FROM entity_roles er
           JOIN entity e ON e.entity_id = er.entity_id
           WHERE {UNICODE_LOWER}(e.entity_nm) = {UNICODE_LOWER}(?1) AND e.entity_type = ?2
           ORDER BY er.created_at",
          cols = qualified("er", RawEntityRole::COLUMNS)
        ),
        vec![
          email.to_owned().into(),
          EntityType::Individual.as_ref().to_owned().into(),
        ],
        |row| RawEntityRole::read(row, 0),
      )
      .await?
      .into_iter()
      .map(RawEntityRole::into_entity_role)
      .collect()
  }

  async fn find_roles_for_entity(&self, entity_id: Uuid) -> Result<Vec<EntityRole>> {
    self
      .fetch(
        format!(
          "SELECT {} FROM entity_roles WHERE entity_id = ?1 ORDER BY created_at",
          RawEntityRole::COLUMNS.join(", ")
        ),
        vec![encode_uuid(entity_id).into()],
        |row| RawEntityRole::read(row, 0),
      )
      .await?
      .into_iter()
      .map(RawEntityRole::into_entity_role)
      .collect()
  }

  async fn delete_entity_role(&self, entity_role_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM entity_roles WHERE entity_role_id = ?1", vec![
        encode_uuid(entity_role_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}
