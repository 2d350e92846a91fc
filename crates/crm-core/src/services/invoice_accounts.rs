//! Invoice accounts, their addresses and account-number allocation.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  error::translate_write_error,
  models::{
    DateRange,
    invoice_account::{
      InvoiceAccount, InvoiceAccountAddress, InvoiceAccountDetail,
      NewInvoiceAccount, NewInvoiceAccountAddress,
    },
  },
  store::InvoiceAccountRepository,
  validate::Validator,
};

/// Body of `POST /invoice-accounts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccountPayload {
  pub company_id:             Option<String>,
  pub invoice_account_number: Option<String>,
  pub start_date:             Option<String>,
  pub end_date:               Option<String>,
  pub is_test:                Option<bool>,
}

impl InvoiceAccountPayload {
  pub fn validate(self) -> Result<NewInvoiceAccount> {
    let mut v = Validator::default();
    let company_id = v.guid("companyId", self.company_id.as_deref().unwrap_or_default());
    let invoice_account_number = v.invoice_account_number(
      "invoiceAccountNumber",
      self.invoice_account_number.as_deref().unwrap_or_default(),
    );
    let start_date = v.start_date("startDate", self.start_date.as_deref());
    let end_date = v.end_date("endDate", self.end_date.as_deref(), start_date);
    v.finish("Invoice account not valid")?;
    Ok(NewInvoiceAccount {
      company_id,
      invoice_account_number,
      dates: DateRange { start_date, end_date },
      is_test: self.is_test.unwrap_or(false),
    })
  }
}

/// Body of `POST /invoice-accounts/{id}/addresses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAccountAddressPayload {
  pub address_id: Option<String>,
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub is_test:    Option<bool>,
}

impl InvoiceAccountAddressPayload {
  pub fn validate(self, invoice_account_id: Uuid) -> Result<NewInvoiceAccountAddress> {
    let mut v = Validator::default();
    let address_id = v.guid("addressId", self.address_id.as_deref().unwrap_or_default());
    let start_date = v.start_date("startDate", self.start_date.as_deref());
    let end_date = v.end_date("endDate", self.end_date.as_deref(), start_date);
    v.finish("Invoice account address not valid")?;
    Ok(NewInvoiceAccountAddress {
      invoice_account_id,
      address_id,
      dates: DateRange { start_date, end_date },
      is_test: self.is_test.unwrap_or(false),
    })
  }
}

pub async fn create_invoice_account<S>(
  store: &S,
  payload: InvoiceAccountPayload,
) -> Result<InvoiceAccount>
where
  S: InvoiceAccountRepository,
{
  let account = store
    .create_invoice_account(payload.validate()?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(
    invoice_account_id = %account.invoice_account_id,
    number = %account.invoice_account_number,
    "invoice account created",
  );
  Ok(account)
}

pub async fn get_invoice_account<S>(
  store: &S,
  invoice_account_id: Uuid,
) -> Result<Option<InvoiceAccountDetail>>
where
  S: InvoiceAccountRepository,
{
  store
    .find_invoice_account(invoice_account_id)
    .await
    .map_err(Error::store)
}

pub async fn get_invoice_accounts_with_current_address<S>(
  store: &S,
  invoice_account_ids: Vec<Uuid>,
) -> Result<Vec<InvoiceAccountDetail>>
where
  S: InvoiceAccountRepository,
{
  store
    .find_invoice_accounts_with_current_address(invoice_account_ids)
    .await
    .map_err(Error::store)
}

pub async fn create_invoice_account_address<S>(
  store: &S,
  invoice_account_id: Uuid,
  payload: InvoiceAccountAddressPayload,
) -> Result<InvoiceAccountAddress>
where
  S: InvoiceAccountRepository,
{
  let address = store
    .create_invoice_account_address(payload.validate(invoice_account_id)?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(
    %invoice_account_id,
    invoice_account_address_id = %address.invoice_account_address_id,
    "invoice account address added",
  );
  Ok(address)
}

pub async fn delete_invoice_account<S>(store: &S, invoice_account_id: Uuid) -> Result<bool>
where
  S: InvoiceAccountRepository,
{
  store
    .delete_invoice_account(invoice_account_id)
    .await
    .map_err(translate_write_error)
}

/// The number following `current` within its region, e.g. `A00000009A` →
/// `A00000010A`.
pub fn increment_account_number(current: &str) -> Result<String> {
  let invalid = || Error::validation(format!("Invoice account number {current} is not valid"));
  let region = current.get(..1).ok_or_else(invalid)?;
  let sequence: u32 = current
    .get(1..9)
    .and_then(|digits| digits.parse().ok())
    .ok_or_else(invalid)?;
  match sequence.checked_add(1).filter(|n| *n <= 99_999_999) {
    Some(next) => Ok(format!("{region}{next:08}A")),
    None => Err(Error::validation(format!(
      "Invoice account numbers for region {region} are exhausted"
    ))),
  }
}

/// The next unused account number for `region`, starting at
/// `{region}00000001A`.
pub async fn next_invoice_account_number<S>(store: &S, region: &str) -> Result<String>
where
  S: InvoiceAccountRepository,
{
  let mut v = Validator::default();
  let region = v.region_code("region", region);
  v.finish("Region not valid")?;

  let greatest = store
    .find_invoice_account_by_greatest_number(&region)
    .await
    .map_err(Error::store)?;

  match greatest {
    Some(account) => increment_account_number(&account.invoice_account_number),
    None => Ok(format!("{region}00000001A")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn increments_within_region() {
    assert_eq!(increment_account_number("A00000009A").unwrap(), "A00000010A");
    assert_eq!(increment_account_number("Y12345678A").unwrap(), "Y12345679A");
  }

  #[test]
  fn last_number_in_region_is_exhausted() {
    assert!(matches!(
      increment_account_number("S99999999A"),
      Err(Error::EntityValidation { .. })
    ));
  }

  #[test]
  fn malformed_number_is_rejected() {
    assert!(increment_account_number("A12").is_err());
  }
}
