use serde::Deserialize;

use crate::{
  Error, Result,
  error::translate_write_error,
  models::role::Role,
  store::RoleRepository,
  validate::Validator,
};

/// Body of `POST /roles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePayload {
  pub name: Option<String>,
}

pub async fn create_role<S>(store: &S, payload: RolePayload) -> Result<Role>
where
  S: RoleRepository,
{
  let mut v = Validator::default();
  let name = v.required_string("name", payload.name);
  v.finish("Role not valid")?;

  let role = store.create_role(&name).await.map_err(translate_write_error)?;
  tracing::info!(role_id = %role.role_id, name = %role.name, "role created");
  Ok(role)
}

pub async fn get_role_by_name<S>(store: &S, name: &str) -> Result<Option<Role>>
where
  S: RoleRepository,
{
  store.find_role_by_name(name).await.map_err(Error::store)
}
