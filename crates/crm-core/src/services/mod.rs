//! Business operations, one module per resource.
//!
//! Services validate their input, call one or more repositories and, after
//! writes, classify storage errors with
//! [`translate_write_error`](crate::error::translate_write_error). Lookups
//! that must find a row fail with [`Error::NotFound`](crate::Error::NotFound)
//! rather than returning an empty result.

pub mod addresses;
pub mod companies;
pub mod contacts;
pub mod document_headers;
pub mod documents;
pub mod entities;
pub mod invoice_accounts;
pub mod roles;
pub mod test_data;

use serde::Deserialize;

use crate::{models::DateRange, validate::Validator};

/// The dated part of a company address or contact association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationTerms {
  pub dates:      DateRange,
  pub is_default: bool,
}

/// Request body fields shared by every association payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationPayload {
  pub role_name:  Option<String>,
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub is_default: Option<bool>,
  pub is_test:    Option<bool>,
}

/// A checked [`AssociationPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
  pub role_name: String,
  pub terms:     AssociationTerms,
  pub is_test:   bool,
}

impl AssociationPayload {
  /// Run the shared checks on `v`; the caller calls `finish`.
  pub fn check(self, v: &mut Validator) -> Association {
    let role_name = v.required_string("roleName", self.role_name);
    let start_date = v.start_date("startDate", self.start_date.as_deref());
    let end_date = v.end_date("endDate", self.end_date.as_deref(), start_date);
    Association {
      role_name,
      terms: AssociationTerms {
        dates:      DateRange { start_date, end_date },
        is_default: self.is_default.unwrap_or(false),
      },
      is_test: self.is_test.unwrap_or(false),
    }
  }
}
