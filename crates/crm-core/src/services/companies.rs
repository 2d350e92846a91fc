//! Companies and their address/contact associations.

use serde::Deserialize;
use uuid::Uuid;

use super::{Association, AssociationPayload, AssociationTerms};
use crate::{
  Error, Result,
  error::translate_write_error,
  models::company::{
    Company, CompanyAddress, CompanyAddressDetail, CompanyContact,
    CompanyContactDetail, CompanyType, NewCompany, NewCompanyAddress,
    NewCompanyContact,
  },
  store::{
    CompanyAddressRepository, CompanyContactRepository, CompanyRepository,
    RoleRepository,
  },
  validate::{Validator, optional_string},
};

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Body of `POST /companies`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
  pub name:              Option<String>,
  #[serde(rename = "type")]
  pub kind:              Option<String>,
  pub company_number:    Option<String>,
  pub organisation_type: Option<String>,
  pub is_test:           Option<bool>,
}

impl CompanyPayload {
  pub fn validate(self) -> Result<NewCompany> {
    let mut v = Validator::default();
    let name = v.required_string("name", self.name);
    let kind = match self.kind.as_deref() {
      Some(k) => match k.parse::<CompanyType>() {
        Ok(kind) => kind,
        Err(_) => {
          v.reject("type", "must be one of [person, organisation]");
          CompanyType::Organisation
        }
      },
      None => {
        v.reject("type", "is required");
        CompanyType::Organisation
      }
    };
    v.finish("Company not valid")?;
    Ok(NewCompany {
      name,
      kind,
      company_number: optional_string(self.company_number),
      organisation_type: optional_string(self.organisation_type),
      is_test: self.is_test.unwrap_or(false),
    })
  }
}

/// Body of `POST /companies/{id}/addresses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAddressPayload {
  pub address_id:  Option<String>,
  #[serde(flatten)]
  pub association: AssociationPayload,
}

impl CompanyAddressPayload {
  pub fn validate(self) -> Result<(Uuid, Association)> {
    let mut v = Validator::default();
    let address_id = v.guid("addressId", self.address_id.as_deref().unwrap_or_default());
    let association = self.association.check(&mut v);
    v.finish("Company address not valid")?;
    Ok((address_id, association))
  }
}

/// Body of `POST /companies/{id}/contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactPayload {
  pub contact_id:  Option<String>,
  #[serde(flatten)]
  pub association: AssociationPayload,
}

impl CompanyContactPayload {
  pub fn validate(self) -> Result<(Uuid, Association)> {
    let mut v = Validator::default();
    let contact_id = v.guid("contactId", self.contact_id.as_deref().unwrap_or_default());
    let association = self.association.check(&mut v);
    v.finish("Company contact not valid")?;
    Ok((contact_id, association))
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Resolve a role name to its id.
pub async fn get_role_id<S>(store: &S, role_name: &str) -> Result<Uuid>
where
  S: RoleRepository,
{
  store
    .find_role_by_name(role_name)
    .await
    .map_err(Error::store)?
    .map(|role| role.role_id)
    .ok_or_else(|| Error::validation(format!("Role with name: {role_name} not found")))
}

pub async fn create_person<S>(store: &S, name: String, is_test: bool) -> Result<Company>
where
  S: CompanyRepository,
{
  create_company(store, NewCompany {
    name,
    kind: CompanyType::Person,
    company_number: None,
    organisation_type: None,
    is_test,
  })
  .await
}

pub async fn create_organisation<S>(
  store: &S,
  name: String,
  company_number: Option<String>,
  organisation_type: Option<String>,
  is_test: bool,
) -> Result<Company>
where
  S: CompanyRepository,
{
  create_company(store, NewCompany {
    name,
    kind: CompanyType::Organisation,
    company_number,
    organisation_type,
    is_test,
  })
  .await
}

pub async fn create_company<S>(store: &S, company: NewCompany) -> Result<Company>
where
  S: CompanyRepository,
{
  let company = store
    .create_company(company)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(company_id = %company.company_id, kind = company.kind.as_ref(), "company created");
  Ok(company)
}

pub async fn search_companies_by_name<S>(store: &S, name: &str) -> Result<Vec<Company>>
where
  S: CompanyRepository,
{
  store.search_companies_by_name(name).await.map_err(Error::store)
}

pub async fn get_company<S>(store: &S, company_id: Uuid) -> Result<Option<Company>>
where
  S: CompanyRepository,
{
  store.find_company(company_id).await.map_err(Error::store)
}

async fn require_company<S>(store: &S, company_id: Uuid) -> Result<Company>
where
  S: CompanyRepository,
{
  get_company(store, company_id)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Company not found {company_id}")))
}

pub async fn add_address<S>(
  store: &S,
  company_id: Uuid,
  address_id: Uuid,
  role_name: &str,
  terms: AssociationTerms,
  is_test: bool,
) -> Result<CompanyAddress>
where
  S: RoleRepository + CompanyAddressRepository,
{
  let role_id = get_role_id(store, role_name).await?;
  let company_address = store
    .create_company_address(NewCompanyAddress {
      company_id,
      address_id,
      role_id,
      dates: terms.dates,
      is_default: terms.is_default,
      is_test,
    })
    .await
    .map_err(translate_write_error)?;
  tracing::info!(
    %company_id,
    company_address_id = %company_address.company_address_id,
    role = role_name,
    "company address added",
  );
  Ok(company_address)
}

pub async fn add_contact<S>(
  store: &S,
  company_id: Uuid,
  contact_id: Uuid,
  role_name: &str,
  terms: AssociationTerms,
  is_test: bool,
) -> Result<CompanyContact>
where
  S: RoleRepository + CompanyContactRepository,
{
  let role_id = get_role_id(store, role_name).await?;
  let company_contact = store
    .create_company_contact(NewCompanyContact {
      company_id,
      contact_id,
      role_id,
      dates: terms.dates,
      is_default: terms.is_default,
      is_test,
    })
    .await
    .map_err(translate_write_error)?;
  tracing::info!(
    %company_id,
    company_contact_id = %company_contact.company_contact_id,
    role = role_name,
    "company contact added",
  );
  Ok(company_contact)
}

pub async fn get_addresses<S>(store: &S, company_id: Uuid) -> Result<Vec<CompanyAddressDetail>>
where
  S: CompanyRepository + CompanyAddressRepository,
{
  require_company(store, company_id).await?;
  store
    .find_company_addresses(company_id)
    .await
    .map_err(Error::store)
}

pub async fn get_contacts<S>(store: &S, company_id: Uuid) -> Result<Vec<CompanyContactDetail>>
where
  S: CompanyRepository + CompanyContactRepository,
{
  require_company(store, company_id).await?;
  store
    .find_company_contacts(company_id)
    .await
    .map_err(Error::store)
}

pub async fn delete_company<S>(store: &S, company_id: Uuid) -> Result<bool>
where
  S: CompanyRepository,
{
  store.delete_company(company_id).await.map_err(translate_write_error)
}

pub async fn delete_company_address<S>(store: &S, company_address_id: Uuid) -> Result<bool>
where
  S: CompanyAddressRepository,
{
  store
    .delete_company_address(company_address_id)
    .await
    .map_err(translate_write_error)
}

pub async fn delete_company_contact<S>(store: &S, company_contact_id: Uuid) -> Result<bool>
where
  S: CompanyContactRepository,
{
  store
    .delete_company_contact(company_contact_id)
    .await
    .map_err(translate_write_error)
}
