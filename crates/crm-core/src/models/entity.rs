//! Entities (individuals, companies, regimes) and the roles linking them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, VariantNames};
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  AsRefStr, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityType {
  #[default]
  Individual,
  Company,
  Regime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
  pub entity_id:   Uuid,
  /// For individuals this is their email address.
  pub entity_nm:   String,
  pub entity_type: EntityType,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
  pub entity_nm:   String,
  pub entity_type: EntityType,
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// What an entity role is scoped to. A role row carries exactly one of the
/// two ids.
///
/// Serialises flat, as the `company_entity_id` or `regime_entity_id` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleScope {
  Company { company_entity_id: Uuid },
  Regime { regime_entity_id: Uuid },
}

impl RoleScope {
  pub fn company(company_entity_id: Uuid) -> Self {
    Self::Company { company_entity_id }
  }

  pub fn regime(regime_entity_id: Uuid) -> Self {
    Self::Regime { regime_entity_id }
  }

  /// Build a scope from the two nullable columns. The company id takes
  /// precedence if both are set; `None` if neither is.
  pub fn from_columns(
    regime_entity_id: Option<Uuid>,
    company_entity_id: Option<Uuid>,
  ) -> Option<Self> {
    match (company_entity_id, regime_entity_id) {
      (Some(company), _) => Some(Self::company(company)),
      (None, Some(regime)) => Some(Self::regime(regime)),
      (None, None) => None,
    }
  }

  /// `(regime_entity_id, company_entity_id)` as stored.
  pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>) {
    match *self {
      Self::Company { company_entity_id } => (None, Some(company_entity_id)),
      Self::Regime { regime_entity_id } => (Some(regime_entity_id), None),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRole {
  pub entity_role_id: Uuid,
  pub entity_id:      Uuid,
  pub role:           String,
  #[serde(flatten)]
  pub scope:          RoleScope,
  pub permissions:    serde_json::Value,
  pub created_at:     DateTime<Utc>,
  pub created_by:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntityRole {
  pub entity_id:   Uuid,
  pub role:        String,
  pub scope:       RoleScope,
  pub permissions: serde_json::Value,
  pub created_by:  Option<String>,
}
