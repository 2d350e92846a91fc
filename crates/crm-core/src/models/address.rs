use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, VariantNames};
use uuid::Uuid;

/// Which system an address was first recorded in.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  AsRefStr, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataSource {
  #[default]
  Wrls,
  Nald,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub address_id:   Uuid,
  pub address1:     Option<String>,
  pub address2:     Option<String>,
  pub address3:     Option<String>,
  pub address4:     Option<String>,
  pub town:         Option<String>,
  pub county:       Option<String>,
  pub postcode:     Option<String>,
  pub country:      Option<String>,
  pub uprn:         Option<i64>,
  pub data_source:  DataSource,
  pub is_test:      bool,
  pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAddress {
  pub address1:    Option<String>,
  pub address2:    Option<String>,
  pub address3:    Option<String>,
  pub address4:    Option<String>,
  pub town:        Option<String>,
  pub county:      Option<String>,
  pub postcode:    Option<String>,
  pub country:     Option<String>,
  pub uprn:        Option<i64>,
  pub data_source: DataSource,
  pub is_test:     bool,
}
