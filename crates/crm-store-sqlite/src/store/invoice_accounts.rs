//! `invoice_accounts` and `invoice_account_addresses`.

use chrono::Utc;
use crm_core::{
  models::invoice_account::{
    InvoiceAccount, InvoiceAccountAddress, InvoiceAccountAddressDetail,
    InvoiceAccountDetail, NewInvoiceAccount, NewInvoiceAccountAddress,
  },
  store::InvoiceAccountRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

use super::SqliteStore;
use crate::{
  Result,
  encode::{
    RawAddress, RawCompany, RawInvoiceAccount, RawInvoiceAccountAddress,
    encode_date, encode_dt, encode_uuid, qualified,
  },
};

/// An account row as read from the database, before decoding.
type RawDetail = (
  RawInvoiceAccount,
  Option<RawCompany>,
  Vec<(RawInvoiceAccountAddress, RawAddress)>,
);

/// Load each account in `ids` (in order, skipping unknown ids) with its
/// company and addresses. With `current_only`, ended addresses are left out.
fn load_details(
  conn: &Connection,
  ids: &[String],
  current_only: bool,
) -> rusqlite::Result<Vec<RawDetail>> {
  let account_sql = format!(
    "SELECT {}, {}
     FROM invoice_accounts ia
     LEFT JOIN companies c ON c.company_id = ia.company_id
     WHERE ia.invoice_account_id = ?1",
    qualified("ia", RawInvoiceAccount::COLUMNS),
    qualified("c", RawCompany::COLUMNS),
  );
  let address_sql = format!(
    "SELECT {}, {}
     FROM invoice_account_addresses iaa
     JOIN addresses a ON a.address_id = iaa.address_id
     WHERE iaa.invoice_account_id = ?1 {}
     ORDER BY iaa.start_date",
    qualified("iaa", RawInvoiceAccountAddress::COLUMNS),
    qualified("a", RawAddress::COLUMNS),
    if current_only { "AND iaa.end_date IS NULL" } else { "" },
  );
  let company_at = RawInvoiceAccount::COLUMNS.len();
  let address_at = RawInvoiceAccountAddress::COLUMNS.len();

  let mut account_stmt = conn.prepare(&account_sql)?;
  let mut address_stmt = conn.prepare(&address_sql)?;
  let mut details = Vec::with_capacity(ids.len());

  for id in ids {
    let mut rows = account_stmt.query([id])?;
    let Some(row) = rows.next()? else { continue };
    let account = RawInvoiceAccount::read(row, 0)?;
    let company = RawCompany::read_optional(row, company_at)?;
    drop(rows);

    let addresses = address_stmt
      .query_map([id], |row| {
        Ok((RawInvoiceAccountAddress::read(row, 0)?, RawAddress::read(row, address_at)?))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    details.push((account, company, addresses));
  }
  Ok(details)
}

fn decode_detail((account, company, addresses): RawDetail) -> Result<InvoiceAccountDetail> {
  Ok(InvoiceAccountDetail {
    invoice_account:           account.into_invoice_account()?,
    company:                   company.map(RawCompany::into_company).transpose()?,
    invoice_account_addresses: addresses
      .into_iter()
      .map(|(link, address)| {
        Ok(InvoiceAccountAddressDetail {
          invoice_account_address: link.into_invoice_account_address()?,
          address:                 address.into_address()?,
        })
      })
      .collect::<Result<Vec<_>>>()?,
  })
}

impl SqliteStore {
  async fn invoice_account_details(
    &self,
    ids: Vec<Uuid>,
    current_only: bool,
  ) -> Result<Vec<InvoiceAccountDetail>> {
    let ids: Vec<String> = ids.into_iter().map(encode_uuid).collect();
    self
      .conn
      .call(move |conn| Ok(load_details(conn, &ids, current_only)?))
      .await?
      .into_iter()
      .map(decode_detail)
      .collect()
  }
}

impl InvoiceAccountRepository for SqliteStore {
  async fn create_invoice_account(&self, account: NewInvoiceAccount) -> Result<InvoiceAccount> {
    let account = InvoiceAccount {
      invoice_account_id:     Uuid::new_v4(),
      company_id:             account.company_id,
      invoice_account_number: account.invoice_account_number,
      start_date:             account.dates.start_date,
      end_date:               account.dates.end_date,
      is_test:                account.is_test,
      date_created:           Utc::now(),
    };

    self
      .execute(
        "INSERT INTO invoice_accounts
           (invoice_account_id, company_id, invoice_account_number, start_date,
            end_date, is_test, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        vec![
          encode_uuid(account.invoice_account_id).into(),
          encode_uuid(account.company_id).into(),
          account.invoice_account_number.clone().into(),
          encode_date(account.start_date).into(),
          account.end_date.map(encode_date).into(),
          account.is_test.into(),
          encode_dt(account.date_created).into(),
        ],
      )
      .await?;

    Ok(account)
  }

  async fn find_invoice_account(
    &self,
    invoice_account_id: Uuid,
  ) -> Result<Option<InvoiceAccountDetail>> {
    Ok(
      self
        .invoice_account_details(vec![invoice_account_id], false)
        .await?
        .pop(),
    )
  }

  async fn find_invoice_accounts_with_current_address(
    &self,
    invoice_account_ids: Vec<Uuid>,
  ) -> Result<Vec<InvoiceAccountDetail>> {
    self.invoice_account_details(invoice_account_ids, true).await
  }

  async fn find_invoice_account_by_greatest_number(
    &self,
    region: &str,
  ) -> Result<Option<InvoiceAccount>> {
    self
      .fetch_one(
        format!(
          "SELECT {} FROM invoice_accounts
           WHERE invoice_account_number LIKE ?1
           ORDER BY invoice_account_number DESC
           LIMIT 1",
          RawInvoiceAccount::COLUMNS.join(", ")
        ),
        vec![format!("{region}%").into()],
        |row| RawInvoiceAccount::read(row, 0),
      )
      .await?
      .map(RawInvoiceAccount::into_invoice_account)
      .transpose()
  }

  async fn create_invoice_account_address(
    &self,
    address: NewInvoiceAccountAddress,
  ) -> Result<InvoiceAccountAddress> {
    let address = InvoiceAccountAddress {
      invoice_account_address_id: Uuid::new_v4(),
      invoice_account_id:         address.invoice_account_id,
      address_id:                 address.address_id,
      start_date:                 address.dates.start_date,
      end_date:                   address.dates.end_date,
      is_test:                    address.is_test,
      date_created:               Utc::now(),
    };

    self
      .execute(
        "INSERT INTO invoice_account_addresses
           (invoice_account_address_id, invoice_account_id, address_id,
            start_date, end_date, is_test, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        vec![
          encode_uuid(address.invoice_account_address_id).into(),
          encode_uuid(address.invoice_account_id).into(),
          encode_uuid(address.address_id).into(),
          encode_date(address.start_date).into(),
          address.end_date.map(encode_date).into(),
          address.is_test.into(),
          encode_dt(address.date_created).into(),
        ],
      )
      .await?;

    Ok(address)
  }

  async fn delete_invoice_account(&self, invoice_account_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM invoice_accounts WHERE invoice_account_id = ?1", vec![
        encode_uuid(invoice_account_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}
