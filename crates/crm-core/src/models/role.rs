use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named role an address or contact plays for a company, e.g. `billing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
  pub role_id: Uuid,
  pub name:    String,
}
