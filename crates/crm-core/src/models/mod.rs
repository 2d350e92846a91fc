//! Row types for every CRM table.
//!
//! v2 resources (companies, contacts, addresses, roles, invoice accounts,
//! documents) serialise as camelCase; the v1 resources (entities, entity
//! roles, document headers) keep their snake_case column names.

pub mod address;
pub mod company;
pub mod contact;
pub mod document;
pub mod document_header;
pub mod entity;
pub mod invoice_account;
pub mod role;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The validity window of an association. An open `end_date` means the
/// association is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
  pub start_date: NaiveDate,
  pub end_date:   Option<NaiveDate>,
}

impl DateRange {
  pub fn starting(start_date: NaiveDate) -> Self {
    Self { start_date, end_date: None }
  }

  pub fn is_current(&self) -> bool { self.end_date.is_none() }
}
