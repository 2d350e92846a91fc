//! A recording mock of the repositories the services call.
//!
//! Reads return whatever the test seeded into [`MockState`]; writes record
//! their input and return a fixture, or fail with [`MockState::write_error`]
//! if one is set.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  error::StorageError,
  models::{
    address::{Address, DataSource},
    company::{
      Company, CompanyAddress, CompanyAddressDetail, CompanyContact,
      CompanyContactDetail, CompanyType, NewCompany, NewCompanyAddress,
      NewCompanyContact,
    },
    contact::Contact,
    entity::{EntityRole, RoleScope},
    role::Role,
  },
  store::{
    CompanyAddressRepository, CompanyContactRepository, CompanyRepository,
    EntityRoleRepository, Repository, RoleRepository,
  },
};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct MockError {
  pub message:  String,
  pub sqlstate: Option<String>,
}

impl MockError {
  pub fn new(message: &str, sqlstate: Option<&str>) -> Self {
    Self { message: message.to_owned(), sqlstate: sqlstate.map(str::to_owned) }
  }
}

impl StorageError for MockError {
  fn sqlstate(&self) -> Option<&str> { self.sqlstate.as_deref() }
}

#[derive(Default)]
pub struct MockState {
  pub role:                      Option<Role>,
  pub company:                   Option<Company>,
  pub write_error:               Option<MockError>,
  pub email_roles:               Vec<EntityRole>,
  pub entity_roles:              Vec<EntityRole>,
  pub company_addresses:         Vec<CompanyAddressDetail>,
  pub company_contacts:          Vec<CompanyContactDetail>,
  // Recorded calls
  pub role_lookups:              Vec<String>,
  pub company_lookups:           Vec<Uuid>,
  pub role_queries:              Vec<String>,
  pub created_companies:         Vec<NewCompany>,
  pub created_company_addresses: Vec<NewCompanyAddress>,
  pub created_company_contacts:  Vec<NewCompanyContact>,
  pub deleted:                   Vec<(&'static str, Uuid)>,
}

#[derive(Default)]
pub struct MockStore {
  pub state: Mutex<MockState>,
}

impl MockStore {
  /// A store where the role lookup finds `role` and the company lookup finds
  /// `company`.
  pub fn with_role_and_company(role: Role, company: Company) -> Self {
    let store = Self::default();
    {
      let mut s = store.state.lock().unwrap();
      s.role = Some(role);
      s.company = Some(company);
    }
    store
  }

  pub fn set<F: FnOnce(&mut MockState)>(&self, f: F) { f(&mut self.state.lock().unwrap()) }

  pub fn get<T, F: FnOnce(&MockState) -> T>(&self, f: F) -> T { f(&self.state.lock().unwrap()) }

  fn write_error(&self) -> Option<MockError> { self.state.lock().unwrap().write_error.clone() }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn role(name: &str) -> Role { Role { role_id: Uuid::new_v4(), name: name.to_owned() } }

pub fn company(company_id: Uuid) -> Company {
  Company {
    company_id,
    name: "Test Co".to_owned(),
    kind: CompanyType::Organisation,
    company_number: None,
    organisation_type: None,
    is_test: true,
    date_created: Utc::now(),
    date_updated: Utc::now(),
  }
}

pub fn address(address_id: Uuid) -> Address {
  Address {
    address_id,
    address1: Some("1 Test Street".to_owned()),
    address2: None,
    address3: None,
    address4: None,
    town: Some("Testington".to_owned()),
    county: None,
    postcode: Some("TT1 1TT".to_owned()),
    country: Some("UK".to_owned()),
    uprn: None,
    data_source: DataSource::Wrls,
    is_test: true,
    date_created: Utc::now(),
  }
}

pub fn contact(contact_id: Uuid) -> Contact {
  Contact {
    contact_id,
    salutation: None,
    first_name: Some("Jo".to_owned()),
    initials: None,
    middle_name: None,
    last_name: "Bloggs".to_owned(),
    is_test: true,
    date_created: Utc::now(),
    date_updated: Utc::now(),
  }
}

pub fn entity_role(scope: RoleScope) -> EntityRole {
  EntityRole {
    entity_role_id: Uuid::new_v4(),
    entity_id: Uuid::new_v4(),
    role: "primary_user".to_owned(),
    scope,
    permissions: serde_json::json!({}),
    created_at: Utc::now(),
    created_by: None,
  }
}

pub fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

// ─── Repository impls ────────────────────────────────────────────────────────

impl Repository for MockStore {
  type Error = MockError;
}

impl RoleRepository for MockStore {
  async fn create_role(&self, name: &str) -> Result<Role, MockError> { Ok(role(name)) }

  async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, MockError> {
    let mut s = self.state.lock().unwrap();
    s.role_lookups.push(name.to_owned());
    Ok(s.role.clone())
  }
}

impl CompanyRepository for MockStore {
  async fn create_company(&self, input: NewCompany) -> Result<Company, MockError> {
    if let Some(err) = self.write_error() {
      return Err(err);
    }
    let mut s = self.state.lock().unwrap();
    s.created_companies.push(input.clone());
    Ok(Company {
      name: input.name,
      kind: input.kind,
      company_number: input.company_number,
      organisation_type: input.organisation_type,
      is_test: input.is_test,
      ..company(Uuid::new_v4())
    })
  }

  async fn find_company(&self, company_id: Uuid) -> Result<Option<Company>, MockError> {
    let mut s = self.state.lock().unwrap();
    s.company_lookups.push(company_id);
    Ok(s.company.clone())
  }

  async fn search_companies_by_name(&self, _name: &str) -> Result<Vec<Company>, MockError> {
    Ok(self.state.lock().unwrap().company.clone().into_iter().collect())
  }

  async fn delete_company(&self, company_id: Uuid) -> Result<bool, MockError> {
    self.state.lock().unwrap().deleted.push(("company", company_id));
    Ok(true)
  }
}

impl CompanyAddressRepository for MockStore {
  async fn create_company_address(
    &self,
    input: NewCompanyAddress,
  ) -> Result<CompanyAddress, MockError> {
    if let Some(err) = self.write_error() {
      return Err(err);
    }
    self.state.lock().unwrap().created_company_addresses.push(input.clone());
    Ok(CompanyAddress {
      company_address_id: Uuid::new_v4(),
      company_id: input.company_id,
      address_id: input.address_id,
      role_id: input.role_id,
      start_date: input.dates.start_date,
      end_date: input.dates.end_date,
      is_default: input.is_default,
      is_test: input.is_test,
      date_created: Utc::now(),
    })
  }

  async fn find_company_addresses(
    &self,
    _company_id: Uuid,
  ) -> Result<Vec<CompanyAddressDetail>, MockError> {
    Ok(self.state.lock().unwrap().company_addresses.clone())
  }

  async fn delete_company_address(&self, id: Uuid) -> Result<bool, MockError> {
    self.state.lock().unwrap().deleted.push(("company_address", id));
    Ok(true)
  }
}

impl CompanyContactRepository for MockStore {
  async fn create_company_contact(
    &self,
    input: NewCompanyContact,
  ) -> Result<CompanyContact, MockError> {
    if let Some(err) = self.write_error() {
      return Err(err);
    }
    self.state.lock().unwrap().created_company_contacts.push(input.clone());
    Ok(CompanyContact {
      company_contact_id: Uuid::new_v4(),
      company_id: input.company_id,
      contact_id: input.contact_id,
      role_id: input.role_id,
      start_date: input.dates.start_date,
      end_date: input.dates.end_date,
      is_default: input.is_default,
      is_test: input.is_test,
      date_created: Utc::now(),
    })
  }

  async fn find_company_contacts(
    &self,
    _company_id: Uuid,
  ) -> Result<Vec<CompanyContactDetail>, MockError> {
    Ok(self.state.lock().unwrap().company_contacts.clone())
  }

  async fn delete_company_contact(&self, id: Uuid) -> Result<bool, MockError> {
    self.state.lock().unwrap().deleted.push(("company_contact", id));
    Ok(true)
  }
}

impl EntityRoleRepository for MockStore {
  async fn create_entity_role(
    &self,
    _role: crate::models::entity::NewEntityRole,
  ) -> Result<EntityRole, MockError> {
    unimplemented!("not used by these tests")
  }

  async fn find_roles_for_email(&self, email: &str) -> Result<Vec<EntityRole>, MockError> {
    let mut s = self.state.lock().unwrap();
    s.role_queries.push(format!("email:{email}"));
    Ok(s.email_roles.clone())
  }

  async fn find_roles_for_entity(&self, entity_id: Uuid) -> Result<Vec<EntityRole>, MockError> {
    let mut s = self.state.lock().unwrap();
    s.role_queries.push(format!("entity:{entity_id}"));
    Ok(s.entity_roles.clone())
  }

  async fn delete_entity_role(&self, _id: Uuid) -> Result<bool, MockError> {
    unimplemented!("not used by these tests")
  }
}
