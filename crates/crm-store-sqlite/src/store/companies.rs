//! `companies`, `company_addresses` and `company_contacts`.

use chrono::Utc;
use crm_core::{
  models::company::{
    Company, CompanyAddress, CompanyAddressDetail, CompanyContact,
    CompanyContactDetail, NewCompany, NewCompanyAddress, NewCompanyContact,
  },
  store::{CompanyAddressRepository, CompanyContactRepository, CompanyRepository},
};
use rusqlite::types::Value;
use uuid::Uuid;

use super::SqliteStore;
use crate::{
  Result,
  encode::{
    RawAddress, RawCompany, RawCompanyLink, RawContact, RawRole, encode_date,
    encode_dt, encode_uuid, qualified,
  },
  schema::UNICODE_LOWER,
};

impl CompanyRepository for SqliteStore {
  async fn create_company(&self, company: NewCompany) -> Result<Company> {
    let now = Utc::now();
    let company = Company {
      company_id:        Uuid::new_v4(),
      name:              company.name,
      kind:              company.kind,
      company_number:    company.company_number,
      organisation_type: company.organisation_type,
      is_test:           company.is_test,
      date_created:      now,
      date_updated:      now,
    };

    self
      .execute(
        "INSERT INTO companies
           (company_id, name, type, company_number, organisation_type, is_test,
            date_created, date_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        vec![
          encode_uuid(company.company_id).into(),
          company.name.clone().into(),
          company.kind.as_ref().to_owned().into(),
          company.company_number.clone().into(),
          company.organisation_type.clone().into(),
          company.is_test.into(),
          encode_dt(now).into(),
          encode_dt(now).into(),
        ],
      )
      .await?;

    Ok(company)
  }

  async fn find_company(&self, company_id: Uuid) -> Result<Option<Company>> {
    self
      .fetch_one(
        format!(
          "SELECT {} FROM companies WHERE company_id = ?1",
          RawCompany::COLUMNS.join(", ")
        ),
        vec![encode_uuid(company_id).into()],
        |row| RawCompany::read(row, 0),
      )
      .await?
      .map(RawCompany::into_company)
      .transpose()
  }

  async fn search_companies_by_name(&self, name: &str) -> Result<Vec<Company>> {
    self
      .fetch(
        format!(
          "SELECT {cols} FROM companies
           WHERE {UNICODE_LOWER}(name) LIKE {UNICODE_LOWER}(?1) ORDER BY name",
          cols = RawCompany::COLUMNS.join(", ")
        ),
        vec![format!("%{name}%").into()],
        |row| RawCompany::read(row, 0),
      )
      .await?
      .into_iter()
      .map(RawCompany::into_company)
      .collect()
  }

  async fn delete_company(&self, company_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM companies WHERE company_id = ?1", vec![
        encode_uuid(company_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}

// ─── Association rows ────────────────────────────────────────────────────────

/// Insert parameters shared by both association tables, in column order.
#[allow(clippy::too_many_arguments)]
fn link_params(
  link_id: Uuid,
  company_id: Uuid,
  target_id: Uuid,
  role_id: Uuid,
  dates: crm_core::models::DateRange,
  is_default: bool,
  is_test: bool,
  date_created: chrono::DateTime<Utc>,
) -> Vec<Value> {
  vec![
    encode_uuid(link_id).into(),
    encode_uuid(company_id).into(),
    encode_uuid(target_id).into(),
    encode_uuid(role_id).into(),
    encode_date(dates.start_date).into(),
    dates.end_date.map(encode_date).into(),
    is_default.into(),
    is_test.into(),
    encode_dt(date_created).into(),
  ]
}

impl CompanyAddressRepository for SqliteStore {
  async fn create_company_address(&self, ca: NewCompanyAddress) -> Result<CompanyAddress> {
    let company_address = CompanyAddress {
      company_address_id: Uuid::new_v4(),
      company_id:         ca.company_id,
      address_id:         ca.address_id,
      role_id:            ca.role_id,
      start_date:         ca.dates.start_date,
      end_date:           ca.dates.end_date,
      is_default:         ca.is_default,
      is_test:            ca.is_test,
      date_created:       Utc::now(),
    };

    self
      .execute(
        "INSERT INTO company_addresses
           (company_address_id, company_id, address_id, role_id, start_date,
            end_date, is_default, is_test, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        link_params(
          company_address.company_address_id,
          ca.company_id,
          ca.address_id,
          ca.role_id,
          ca.dates,
          ca.is_default,
          ca.is_test,
          company_address.date_created,
        ),
      )
      .await?;

    Ok(company_address)
  }

  async fn find_company_addresses(&self, company_id: Uuid) -> Result<Vec<CompanyAddressDetail>> {
    let sql = format!(
      "SELECT {}, {}, {}
       FROM company_addresses ca
       JOIN addresses a ON a.address_id = ca.address_id
       JOIN roles r     ON r.role_id    = ca.role_id
       WHERE ca.company_id = ?1
       ORDER BY ca.start_date, ca.date_created",
      qualified("ca", RawCompanyLink::ADDRESS_COLUMNS),
      qualified("a", RawAddress::COLUMNS),
      qualified("r", RawRole::COLUMNS),
    );
    let role_at = RawCompanyLink::WIDTH + RawAddress::COLUMNS.len();

    self
      .fetch(sql, vec![encode_uuid(company_id).into()], move |row| {
        Ok((
          RawCompanyLink::read(row, 0)?,
          RawAddress::read(row, RawCompanyLink::WIDTH)?,
          RawRole::read(row, role_at)?,
        ))
      })
      .await?
      .into_iter()
      .map(|(link, address, role)| -> Result<CompanyAddressDetail> {
        Ok(CompanyAddressDetail {
          company_address: link.into_company_address()?,
          address:         address.into_address()?,
          role:            role.into_role()?,
        })
      })
      .collect()
  }

  async fn delete_company_address(&self, company_address_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM company_addresses WHERE company_address_id = ?1", vec![
        encode_uuid(company_address_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}

impl CompanyContactRepository for SqliteStore {
  async fn create_company_contact(&self, cc: NewCompanyContact) -> Result<CompanyContact> {
    let company_contact = CompanyContact {
      company_contact_id: Uuid::new_v4(),
      company_id:         cc.company_id,
      contact_id:         cc.contact_id,
      role_id:            cc.role_id,
      start_date:         cc.dates.start_date,
      end_date:           cc.dates.end_date,
      is_default:         cc.is_default,
      is_test:            cc.is_test,
      date_created:       Utc::now(),
    };

    self
      .execute(
        "INSERT INTO company_contacts
           (company_contact_id, company_id, contact_id, role_id, start_date,
            end_date, is_default, is_test, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        link_params(
          company_contact.company_contact_id,
          cc.company_id,
          cc.contact_id,
          cc.role_id,
          cc.dates,
          cc.is_default,
          cc.is_test,
          company_contact.date_created,
        ),
      )
      .await?;

    Ok(company_contact)
  }

  async fn find_company_contacts(&self, company_id: Uuid) -> Result<Vec<CompanyContactDetail>> {
    let sql = format!(
      "SELECT {}, {}, {}
       FROM company_contacts cc
       JOIN contacts c ON c.contact_id = cc.contact_id
       JOIN roles r    ON r.role_id    = cc.role_id
       WHERE cc.company_id = ?1
       ORDER BY cc.start_date, cc.date_created",
      qualified("cc", RawCompanyLink::CONTACT_COLUMNS),
      qualified("c", RawContact::COLUMNS),
      qualified("r", RawRole::COLUMNS),
    );
    let role_at = RawCompanyLink::WIDTH + RawContact::COLUMNS.len();

    self
      .fetch(sql, vec![encode_uuid(company_id).into()], move |row| {
        Ok((
          RawCompanyLink::read(row, 0)?,
          RawContact::read(row, RawCompanyLink::WIDTH)?,
          RawRole::read(row, role_at)?,
        ))
      })
      .await?
      .into_iter()
      .map(|(link, contact, role)| -> Result<CompanyContactDetail> {
        Ok(CompanyContactDetail {
          company_contact: link.into_company_contact()?,
          contact:         contact.into_contact()?,
          role:            role.into_role()?,
        })
      })
      .collect()
  }

  async fn delete_company_contact(&self, company_contact_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM company_contacts WHERE company_contact_id = ?1", vec![
        encode_uuid(company_contact_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}
