//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings. Closed sets are stored by their
//! serialised name.
//!
//! Each `Raw*` row type lists its columns in [`COLUMNS`](RawCompany::COLUMNS)
//! order and is read positionally starting at a caller-chosen offset, so one
//! joined row can hold several of them side by side.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use crm_core::{
  models::{
    address::{Address, DataSource},
    company::{Company, CompanyAddress, CompanyContact, CompanyType},
    contact::Contact,
    document::{Document, DocumentStatus, DocumentType, Regime},
    document_header::DocumentHeader,
    entity::{Entity, EntityRole, EntityType, RoleScope},
    invoice_account::{InvoiceAccount, InvoiceAccountAddress},
    role::Role,
  },
  validate::DATE_FORMAT,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

/// Decode a closed-set column by its serialised name.
pub fn decode_enum<T: FromStr>(column: &'static str, value: String) -> Result<T> {
  value
    .parse()
    .map_err(|_| Error::InvalidColumn { column, value })
}

pub fn encode_json(value: &serde_json::Value) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json(s: &str) -> Result<serde_json::Value> { Ok(serde_json::from_str(s)?) }

// ─── Roles ───────────────────────────────────────────────────────────────────

pub struct RawRole {
  pub role_id: String,
  pub name:    String,
}

impl RawRole {
  pub const COLUMNS: &'static [&'static str] = &["role_id", "name"];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self { role_id: row.get(at)?, name: row.get(at + 1)? })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role { role_id: decode_uuid(&self.role_id)?, name: self.name })
  }
}

// ─── Companies ───────────────────────────────────────────────────────────────

pub struct RawCompany {
  pub company_id:        String,
  pub name:              String,
  pub kind:              String,
  pub company_number:    Option<String>,
  pub organisation_type: Option<String>,
  pub is_test:           bool,
  pub date_created:      String,
  pub date_updated:      String,
}

impl RawCompany {
  pub const COLUMNS: &'static [&'static str] = &[
    "company_id",
    "name",
    "type",
    "company_number",
    "organisation_type",
    "is_test",
    "date_created",
    "date_updated",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      company_id:        row.get(at)?,
      name:              row.get(at + 1)?,
      kind:              row.get(at + 2)?,
      company_number:    row.get(at + 3)?,
      organisation_type: row.get(at + 4)?,
      is_test:           row.get(at + 5)?,
      date_created:      row.get(at + 6)?,
      date_updated:      row.get(at + 7)?,
    })
  }

  /// `None` when the row came from the null side of an outer join.
  pub fn read_optional(row: &Row<'_>, at: usize) -> rusqlite::Result<Option<Self>> {
    match row.get::<_, Option<String>>(at)? {
      Some(_) => Self::read(row, at).map(Some),
      None => Ok(None),
    }
  }

  pub fn into_company(self) -> Result<Company> {
    Ok(Company {
      company_id:        decode_uuid(&self.company_id)?,
      name:              self.name,
      kind:              decode_enum::<CompanyType>("type", self.kind)?,
      company_number:    self.company_number,
      organisation_type: self.organisation_type,
      is_test:           self.is_test,
      date_created:      decode_dt(&self.date_created)?,
      date_updated:      decode_dt(&self.date_updated)?,
    })
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

pub struct RawContact {
  pub contact_id:   String,
  pub salutation:   Option<String>,
  pub first_name:   Option<String>,
  pub initials:     Option<String>,
  pub middle_name:  Option<String>,
  pub last_name:    String,
  pub is_test:      bool,
  pub date_created: String,
  pub date_updated: String,
}

impl RawContact {
  pub const COLUMNS: &'static [&'static str] = &[
    "contact_id",
    "salutation",
    "first_name",
    "initials",
    "middle_name",
    "last_name",
    "is_test",
    "date_created",
    "date_updated",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:   row.get(at)?,
      salutation:   row.get(at + 1)?,
      first_name:   row.get(at + 2)?,
      initials:     row.get(at + 3)?,
      middle_name:  row.get(at + 4)?,
      last_name:    row.get(at + 5)?,
      is_test:      row.get(at + 6)?,
      date_created: row.get(at + 7)?,
      date_updated: row.get(at + 8)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      contact_id:   decode_uuid(&self.contact_id)?,
      salutation:   self.salutation,
      first_name:   self.first_name,
      initials:     self.initials,
      middle_name:  self.middle_name,
      last_name:    self.last_name,
      is_test:      self.is_test,
      date_created: decode_dt(&self.date_created)?,
      date_updated: decode_dt(&self.date_updated)?,
    })
  }
}

// ─── Addresses ───────────────────────────────────────────────────────────────

pub struct RawAddress {
  pub address_id:   String,
  pub lines:        [Option<String>; 4],
  pub town:         Option<String>,
  pub county:       Option<String>,
  pub postcode:     Option<String>,
  pub country:      Option<String>,
  pub uprn:         Option<i64>,
  pub data_source:  String,
  pub is_test:      bool,
  pub date_created: String,
}

impl RawAddress {
  pub const COLUMNS: &'static [&'static str] = &[
    "address_id",
    "address_1",
    "address_2",
    "address_3",
    "address_4",
    "town",
    "county",
    "postcode",
    "country",
    "uprn",
    "data_source",
    "is_test",
    "date_created",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      address_id:   row.get(at)?,
      lines:        [
        row.get(at + 1)?,
        row.get(at + 2)?,
        row.get(at + 3)?,
        row.get(at + 4)?,
      ],
      town:         row.get(at + 5)?,
      county:       row.get(at + 6)?,
      postcode:     row.get(at + 7)?,
      country:      row.get(at + 8)?,
      uprn:         row.get(at + 9)?,
      data_source:  row.get(at + 10)?,
      is_test:      row.get(at + 11)?,
      date_created: row.get(at + 12)?,
    })
  }

  pub fn into_address(self) -> Result<Address> {
    let [address1, address2, address3, address4] = self.lines;
    Ok(Address {
      address_id: decode_uuid(&self.address_id)?,
      address1,
      address2,
      address3,
      address4,
      town: self.town,
      county: self.county,
      postcode: self.postcode,
      country: self.country,
      uprn: self.uprn,
      data_source: decode_enum::<DataSource>("data_source", self.data_source)?,
      is_test: self.is_test,
      date_created: decode_dt(&self.date_created)?,
    })
  }
}

// ─── Associations ────────────────────────────────────────────────────────────

/// The shape shared by `company_addresses` and `company_contacts`; `target_id`
/// is the address or contact id.
pub struct RawCompanyLink {
  pub link_id:      String,
  pub company_id:   String,
  pub target_id:    String,
  pub role_id:      String,
  pub start_date:   String,
  pub end_date:     Option<String>,
  pub is_default:   bool,
  pub is_test:      bool,
  pub date_created: String,
}

impl RawCompanyLink {
  pub const ADDRESS_COLUMNS: &'static [&'static str] = &[
    "company_address_id",
    "company_id",
    "address_id",
    "role_id",
    "start_date",
    "end_date",
    "is_default",
    "is_test",
    "date_created",
  ];

  pub const CONTACT_COLUMNS: &'static [&'static str] = &[
    "company_contact_id",
    "company_id",
    "contact_id",
    "role_id",
    "start_date",
    "end_date",
    "is_default",
    "is_test",
    "date_created",
  ];

  pub const WIDTH: usize = 9;

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      link_id:      row.get(at)?,
      company_id:   row.get(at + 1)?,
      target_id:    row.get(at + 2)?,
      role_id:      row.get(at + 3)?,
      start_date:   row.get(at + 4)?,
      end_date:     row.get(at + 5)?,
      is_default:   row.get(at + 6)?,
      is_test:      row.get(at + 7)?,
      date_created: row.get(at + 8)?,
    })
  }

  pub fn into_company_address(self) -> Result<CompanyAddress> {
    Ok(CompanyAddress {
      company_address_id: decode_uuid(&self.link_id)?,
      company_id:         decode_uuid(&self.company_id)?,
      address_id:         decode_uuid(&self.target_id)?,
      role_id:            decode_uuid(&self.role_id)?,
      start_date:         decode_date(&self.start_date)?,
      end_date:           decode_opt_date(self.end_date)?,
      is_default:         self.is_default,
      is_test:            self.is_test,
      date_created:       decode_dt(&self.date_created)?,
    })
  }

  pub fn into_company_contact(self) -> Result<CompanyContact> {
    Ok(CompanyContact {
      company_contact_id: decode_uuid(&self.link_id)?,
      company_id:         decode_uuid(&self.company_id)?,
      contact_id:         decode_uuid(&self.target_id)?,
      role_id:            decode_uuid(&self.role_id)?,
      start_date:         decode_date(&self.start_date)?,
      end_date:           decode_opt_date(self.end_date)?,
      is_default:         self.is_default,
      is_test:            self.is_test,
      date_created:       decode_dt(&self.date_created)?,
    })
  }
}

// ─── Invoice accounts ────────────────────────────────────────────────────────

pub struct RawInvoiceAccount {
  pub invoice_account_id:     String,
  pub company_id:             String,
  pub invoice_account_number: String,
  pub start_date:             String,
  pub end_date:               Option<String>,
  pub is_test:                bool,
  pub date_created:           String,
}

impl RawInvoiceAccount {
  pub const COLUMNS: &'static [&'static str] = &[
    "invoice_account_id",
    "company_id",
    "invoice_account_number",
    "start_date",
    "end_date",
    "is_test",
    "date_created",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      invoice_account_id:     row.get(at)?,
      company_id:             row.get(at + 1)?,
      invoice_account_number: row.get(at + 2)?,
      start_date:             row.get(at + 3)?,
      end_date:               row.get(at + 4)?,
      is_test:                row.get(at + 5)?,
      date_created:           row.get(at + 6)?,
    })
  }

  pub fn into_invoice_account(self) -> Result<InvoiceAccount> {
    Ok(InvoiceAccount {
      invoice_account_id:     decode_uuid(&self.invoice_account_id)?,
      company_id:             decode_uuid(&self.company_id)?,
      invoice_account_number: self.invoice_account_number,
      start_date:             decode_date(&self.start_date)?,
      end_date:               decode_opt_date(self.end_date)?,
      is_test:                self.is_test,
      date_created:           decode_dt(&self.date_created)?,
    })
  }
}

pub struct RawInvoiceAccountAddress {
  pub invoice_account_address_id: String,
  pub invoice_account_id:         String,
  pub address_id:                 String,
  pub start_date:                 String,
  pub end_date:                   Option<String>,
  pub is_test:                    bool,
  pub date_created:               String,
}

impl RawInvoiceAccountAddress {
  pub const COLUMNS: &'static [&'static str] = &[
    "invoice_account_address_id",
    "invoice_account_id",
    "address_id",
    "start_date",
    "end_date",
    "is_test",
    "date_created",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      invoice_account_address_id: row.get(at)?,
      invoice_account_id:         row.get(at + 1)?,
      address_id:                 row.get(at + 2)?,
      start_date:                 row.get(at + 3)?,
      end_date:                   row.get(at + 4)?,
      is_test:                    row.get(at + 5)?,
      date_created:               row.get(at + 6)?,
    })
  }

  pub fn into_invoice_account_address(self) -> Result<InvoiceAccountAddress> {
    Ok(InvoiceAccountAddress {
      invoice_account_address_id: decode_uuid(&self.invoice_account_address_id)?,
      invoice_account_id:         decode_uuid(&self.invoice_account_id)?,
      address_id:                 decode_uuid(&self.address_id)?,
      start_date:                 decode_date(&self.start_date)?,
      end_date:                   decode_opt_date(self.end_date)?,
      is_test:                    self.is_test,
      date_created:               decode_dt(&self.date_created)?,
    })
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

pub struct RawDocument {
  pub document_id:   String,
  pub regime:        String,
  pub document_type: String,
  pub document_ref:  String,
  pub status:        String,
  pub version:       i64,
  pub start_date:    String,
  pub end_date:      Option<String>,
  pub is_test:       bool,
  pub date_created:  String,
}

impl RawDocument {
  pub const COLUMNS: &'static [&'static str] = &[
    "document_id",
    "regime",
    "document_type",
    "document_ref",
    "status",
    "version",
    "start_date",
    "end_date",
    "is_test",
    "date_created",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:   row.get(at)?,
      regime:        row.get(at + 1)?,
      document_type: row.get(at + 2)?,
      document_ref:  row.get(at + 3)?,
      status:        row.get(at + 4)?,
      version:       row.get(at + 5)?,
      start_date:    row.get(at + 6)?,
      end_date:      row.get(at + 7)?,
      is_test:       row.get(at + 8)?,
      date_created:  row.get(at + 9)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id:   decode_uuid(&self.document_id)?,
      regime:        decode_enum::<Regime>("regime", self.regime)?,
      document_type: decode_enum::<DocumentType>("document_type", self.document_type)?,
      document_ref:  self.document_ref,
      status:        decode_enum::<DocumentStatus>("status", self.status)?,
      version:       self.version,
      start_date:    decode_date(&self.start_date)?,
      end_date:      decode_opt_date(self.end_date)?,
      is_test:       self.is_test,
      date_created:  decode_dt(&self.date_created)?,
    })
  }
}

// ─── Entities ────────────────────────────────────────────────────────────────

pub struct RawEntity {
  pub entity_id:   String,
  pub entity_nm:   String,
  pub entity_type: String,
  pub created_at:  String,
}

impl RawEntity {
  pub const COLUMNS: &'static [&'static str] =
    &["entity_id", "entity_nm", "entity_type", "created_at"];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      entity_id:   row.get(at)?,
      entity_nm:   row.get(at + 1)?,
      entity_type: row.get(at + 2)?,
      created_at:  row.get(at + 3)?,
    })
  }

  pub fn into_entity(self) -> Result<Entity> {
    Ok(Entity {
      entity_id:   decode_uuid(&self.entity_id)?,
      entity_nm:   self.entity_nm,
      entity_type: decode_enum::<EntityType>("entity_type", self.entity_type)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawEntityRole {
  pub entity_role_id:    String,
  pub entity_id:         String,
  pub role:              String,
  pub regime_entity_id:  Option<String>,
  pub company_entity_id: Option<String>,
  pub permissions:       String,
  pub created_at:        String,
  pub created_by:        Option<String>,
}

impl RawEntityRole {
  pub const COLUMNS: &'static [&'static str] = &[
    "entity_role_id",
    "entity_id",
    "role",
    "regime_entity_id",
    "company_entity_id",
    "permissions",
    "created_at",
    "created_by",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      entity_role_id:    row.get(at)?,
      entity_id:         row.get(at + 1)?,
      role:              row.get(at + 2)?,
      regime_entity_id:  row.get(at + 3)?,
      company_entity_id: row.get(at + 4)?,
      permissions:       row.get(at + 5)?,
      created_at:        row.get(at + 6)?,
      created_by:        row.get(at + 7)?,
    })
  }

  pub fn into_entity_role(self) -> Result<EntityRole> {
    let scope = RoleScope::from_columns(
      decode_opt_uuid(self.regime_entity_id)?,
      decode_opt_uuid(self.company_entity_id)?,
    )
    .ok_or_else(|| Error::InvalidColumn {
      column: "regime_entity_id",
      value:  format!("role {} has neither a regime nor a company", self.entity_role_id),
    })?;
    Ok(EntityRole {
      entity_role_id: decode_uuid(&self.entity_role_id)?,
      entity_id: decode_uuid(&self.entity_id)?,
      role: self.role,
      scope,
      permissions: decode_json(&self.permissions)?,
      created_at: decode_dt(&self.created_at)?,
      created_by: self.created_by,
    })
  }
}

// ─── Document headers ────────────────────────────────────────────────────────

pub struct RawDocumentHeader {
  pub document_id:        String,
  pub regime_entity_id:   String,
  pub system_id:          String,
  pub system_internal_id: String,
  pub system_external_id: String,
  pub document_name:      Option<String>,
  pub metadata:           String,
  pub company_entity_id:  Option<String>,
  pub verified:           Option<i64>,
  pub verification_id:    Option<String>,
}

impl RawDocumentHeader {
  pub const COLUMNS: &'static [&'static str] = &[
    "document_id",
    "regime_entity_id",
    "system_id",
    "system_internal_id",
    "system_external_id",
    "document_name",
    "metadata",
    "company_entity_id",
    "verified",
    "verification_id",
  ];

  pub fn read(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:        row.get(at)?,
      regime_entity_id:   row.get(at + 1)?,
      system_id:          row.get(at + 2)?,
      system_internal_id: row.get(at + 3)?,
      system_external_id: row.get(at + 4)?,
      document_name:      row.get(at + 5)?,
      metadata:           row.get(at + 6)?,
      company_entity_id:  row.get(at + 7)?,
      verified:           row.get(at + 8)?,
      verification_id:    row.get(at + 9)?,
    })
  }

  pub fn into_document_header(self) -> Result<DocumentHeader> {
    Ok(DocumentHeader {
      document_id:        decode_uuid(&self.document_id)?,
      regime_entity_id:   decode_uuid(&self.regime_entity_id)?,
      system_id:          self.system_id,
      system_internal_id: self.system_internal_id,
      system_external_id: self.system_external_id,
      document_name:      self.document_name,
      metadata:           decode_json(&self.metadata)?,
      company_entity_id:  decode_opt_uuid(self.company_entity_id)?,
      verified:           self.verified,
      verification_id:    decode_opt_uuid(self.verification_id)?,
    })
  }
}

/// `alias.col, alias.col, ...` for a join select list.
pub fn qualified(alias: &str, columns: &[&str]) -> String {
  columns
    .iter()
    .map(|c| format!("{alias}.{c}"))
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_format() {
    let d = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
    assert_eq!(encode_date(d), "2020-04-01");
    assert_eq!(decode_date("2020-04-01").unwrap(), d);
    assert!(matches!(decode_date("01/04/2020"), Err(Error::DateParse(_))));
  }

  #[test]
  fn unknown_enum_values_name_their_column() {
    let err = decode_enum::<CompanyType>("type", "charity".into()).unwrap_err();
    match err {
      Error::InvalidColumn { column, value } => {
        assert_eq!(column, "type");
        assert_eq!(value, "charity");
      }
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn qualified_columns() {
    assert_eq!(qualified("r", RawRole::COLUMNS), "r.role_id, r.name");
  }
}
