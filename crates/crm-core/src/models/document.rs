//! v2 licence documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, VariantNames};
use uuid::Uuid;

use super::DateRange;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  AsRefStr, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Regime {
  #[default]
  Water,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  AsRefStr, EnumString, VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentType {
  #[default]
  AbstractionLicence,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  AsRefStr, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
  #[default]
  Current,
  Draft,
  Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  pub document_id:   Uuid,
  pub regime:        Regime,
  pub document_type: DocumentType,
  pub document_ref:  String,
  pub status:        DocumentStatus,
  pub version:       i64,
  pub start_date:    NaiveDate,
  pub end_date:      Option<NaiveDate>,
  pub is_test:       bool,
  pub date_created:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
  pub regime:        Regime,
  pub document_type: DocumentType,
  pub document_ref:  String,
  pub status:        DocumentStatus,
  pub version:       i64,
  pub dates:         DateRange,
  pub is_test:       bool,
}
