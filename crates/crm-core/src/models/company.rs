//! Companies and the addresses/contacts associated with them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use super::{DateRange, address::Address, contact::Contact, role::Role};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompanyType {
  Person,
  Organisation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
  pub company_id:        Uuid,
  pub name:              String,
  #[serde(rename = "type")]
  pub kind:              CompanyType,
  pub company_number:    Option<String>,
  pub organisation_type: Option<String>,
  pub is_test:           bool,
  pub date_created:      DateTime<Utc>,
  pub date_updated:      DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
  pub name:              String,
  pub kind:              CompanyType,
  pub company_number:    Option<String>,
  pub organisation_type: Option<String>,
  pub is_test:           bool,
}

// ─── Company addresses ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAddress {
  pub company_address_id: Uuid,
  pub company_id:         Uuid,
  pub address_id:         Uuid,
  pub role_id:            Uuid,
  pub start_date:         NaiveDate,
  pub end_date:           Option<NaiveDate>,
  pub is_default:         bool,
  pub is_test:            bool,
  pub date_created:       DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompanyAddress {
  pub company_id: Uuid,
  pub address_id: Uuid,
  pub role_id:    Uuid,
  pub dates:      DateRange,
  pub is_default: bool,
  pub is_test:    bool,
}

/// A company address together with the address and role it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAddressDetail {
  #[serde(flatten)]
  pub company_address: CompanyAddress,
  pub address:         Address,
  pub role:            Role,
}

// ─── Company contacts ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContact {
  pub company_contact_id: Uuid,
  pub company_id:         Uuid,
  pub contact_id:         Uuid,
  pub role_id:            Uuid,
  pub start_date:         NaiveDate,
  pub end_date:           Option<NaiveDate>,
  pub is_default:         bool,
  pub is_test:            bool,
  pub date_created:       DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompanyContact {
  pub company_id: Uuid,
  pub contact_id: Uuid,
  pub role_id:    Uuid,
  pub dates:      DateRange,
  pub is_default: bool,
  pub is_test:    bool,
}

/// A company contact together with the contact and role it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactDetail {
  #[serde(flatten)]
  pub company_contact: CompanyContact,
  pub contact:         Contact,
  pub role:            Role,
}
