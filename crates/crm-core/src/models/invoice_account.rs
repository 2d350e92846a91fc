//! Invoice accounts and their billing addresses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DateRange, address::Address, company::Company};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccount {
  pub invoice_account_id:     Uuid,
  pub company_id:             Uuid,
  pub invoice_account_number: String,
  pub start_date:             NaiveDate,
  pub end_date:               Option<NaiveDate>,
  pub is_test:                bool,
  pub date_created:           DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceAccount {
  pub company_id:             Uuid,
  pub invoice_account_number: String,
  pub dates:                  DateRange,
  pub is_test:                bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccountAddress {
  pub invoice_account_address_id: Uuid,
  pub invoice_account_id:         Uuid,
  pub address_id:                 Uuid,
  pub start_date:                 NaiveDate,
  pub end_date:                   Option<NaiveDate>,
  pub is_test:                    bool,
  pub date_created:               DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceAccountAddress {
  pub invoice_account_id: Uuid,
  pub address_id:         Uuid,
  pub dates:              DateRange,
  pub is_test:            bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccountAddressDetail {
  #[serde(flatten)]
  pub invoice_account_address: InvoiceAccountAddress,
  pub address:                 Address,
}

/// An invoice account with its company and addresses fetched alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccountDetail {
  #[serde(flatten)]
  pub invoice_account:           InvoiceAccount,
  /// `None` only if the company row has been removed underneath the account.
  pub company:                   Option<Company>,
  pub invoice_account_addresses: Vec<InvoiceAccountAddressDetail>,
}
