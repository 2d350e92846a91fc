//! Repository traits implemented by storage backends (e.g. `crm-store-sqlite`).
//!
//! Each table gets its own trait so services can state exactly which
//! repositories they touch. All of them share the backend's error type
//! through [`Repository`], and [`CrmStore`] names the full set for callers
//! (like the HTTP layer) that need everything.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  error::StorageError,
  filter::DocumentQuery,
  models::{
    address::{Address, NewAddress},
    company::{
      Company, CompanyAddress, CompanyAddressDetail, CompanyContact,
      CompanyContactDetail, NewCompany, NewCompanyAddress, NewCompanyContact,
    },
    contact::{Contact, NewContact},
    document::{Document, DocumentType, NewDocument, Regime},
    document_header::{DocumentHeader, NewDocumentHeader},
    entity::{Entity, EntityRole, NewEntity, NewEntityRole},
    invoice_account::{
      InvoiceAccount, InvoiceAccountAddress, InvoiceAccountDetail,
      NewInvoiceAccount, NewInvoiceAccountAddress,
    },
    role::Role,
  },
};

/// The error type shared by every repository of one backend.
pub trait Repository: Send + Sync {
  type Error: StorageError;
}

// ─── v2 tables ───────────────────────────────────────────────────────────────

pub trait CompanyRepository: Repository {
  fn create_company(
    &self,
    company: NewCompany,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn find_company(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  /// Case-insensitive partial match on the company name.
  fn search_companies_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<Company>, Self::Error>> + Send + 'a;

  /// Returns `false` if there was nothing to delete.
  fn delete_company(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait ContactRepository: Repository {
  fn create_contact(
    &self,
    contact: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn find_contact(
    &self,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Ids with no matching row are skipped.
  fn find_contacts_by_ids(
    &self,
    contact_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn delete_contact(
    &self,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait AddressRepository: Repository {
  fn create_address(
    &self,
    address: NewAddress,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  fn find_address(
    &self,
    address_id: Uuid,
  ) -> impl Future<Output = Result<Option<Address>, Self::Error>> + Send + '_;

  fn delete_address(
    &self,
    address_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait RoleRepository: Repository {
  fn create_role<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + 'a;

  fn find_role_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + 'a;
}

pub trait CompanyAddressRepository: Repository {
  fn create_company_address(
    &self,
    company_address: NewCompanyAddress,
  ) -> impl Future<Output = Result<CompanyAddress, Self::Error>> + Send + '_;

  /// All addresses of a company, each with its address and role.
  fn find_company_addresses(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CompanyAddressDetail>, Self::Error>> + Send + '_;

  fn delete_company_address(
    &self,
    company_address_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait CompanyContactRepository: Repository {
  fn create_company_contact(
    &self,
    company_contact: NewCompanyContact,
  ) -> impl Future<Output = Result<CompanyContact, Self::Error>> + Send + '_;

  /// All contacts of a company, each with its contact and role.
  fn find_company_contacts(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CompanyContactDetail>, Self::Error>> + Send + '_;

  fn delete_company_contact(
    &self,
    company_contact_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait InvoiceAccountRepository: Repository {
  fn create_invoice_account(
    &self,
    invoice_account: NewInvoiceAccount,
  ) -> impl Future<Output = Result<InvoiceAccount, Self::Error>> + Send + '_;

  /// The account with its company and every one of its addresses.
  fn find_invoice_account(
    &self,
    invoice_account_id: Uuid,
  ) -> impl Future<Output = Result<Option<InvoiceAccountDetail>, Self::Error>> + Send + '_;

  /// The given accounts, each with its company and only its current
  /// (open-ended) addresses.
  fn find_invoice_accounts_with_current_address(
    &self,
    invoice_account_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<InvoiceAccountDetail>, Self::Error>> + Send + '_;

  /// The account whose number sorts highest among those starting with
  /// `region`.
  fn find_invoice_account_by_greatest_number<'a>(
    &'a self,
    region: &'a str,
  ) -> impl Future<Output = Result<Option<InvoiceAccount>, Self::Error>> + Send + 'a;

  fn create_invoice_account_address(
    &self,
    address: NewInvoiceAccountAddress,
  ) -> impl Future<Output = Result<InvoiceAccountAddress, Self::Error>> + Send + '_;

  fn delete_invoice_account(
    &self,
    invoice_account_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait DocumentRepository: Repository {
  fn create_document(
    &self,
    document: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  fn find_documents_by_ref<'a>(
    &'a self,
    regime: Regime,
    document_type: DocumentType,
    document_ref: &'a str,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;
}

/// Row counts removed by [`TestDataRepository::delete_test_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTestData {
  pub company_addresses:         u64,
  pub company_contacts:          u64,
  pub invoice_account_addresses: u64,
  pub invoice_accounts:          u64,
  pub documents:                 u64,
  pub companies:                 u64,
  pub contacts:                  u64,
  pub addresses:                 u64,
}

impl DeletedTestData {
  pub fn total(&self) -> u64 {
    self.company_addresses
      + self.company_contacts
      + self.invoice_account_addresses
      + self.invoice_accounts
      + self.documents
      + self.companies
      + self.contacts
      + self.addresses
  }
}

pub trait TestDataRepository: Repository {
  /// Delete every `is_test` row from the v2 tables, dependents first.
  fn delete_test_data(
    &self,
  ) -> impl Future<Output = Result<DeletedTestData, Self::Error>> + Send + '_;
}

// ─── v1 tables ───────────────────────────────────────────────────────────────

pub trait EntityRepository: Repository {
  fn create_entity(
    &self,
    entity: NewEntity,
  ) -> impl Future<Output = Result<Entity, Self::Error>> + Send + '_;

  fn find_entity(
    &self,
    entity_id: Uuid,
  ) -> impl Future<Output = Result<Option<Entity>, Self::Error>> + Send + '_;
}

pub trait EntityRoleRepository: Repository {
  fn create_entity_role(
    &self,
    role: NewEntityRole,
  ) -> impl Future<Output = Result<EntityRole, Self::Error>> + Send + '_;

  /// Roles held by the individual entity whose name equals `email`,
  /// compared case-insensitively.
  fn find_roles_for_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Vec<EntityRole>, Self::Error>> + Send + 'a;

  fn find_roles_for_entity(
    &self,
    entity_id: Uuid,
  ) -> impl Future<Output = Result<Vec<EntityRole>, Self::Error>> + Send + '_;

  fn delete_entity_role(
    &self,
    entity_role_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

pub trait DocumentHeaderRepository: Repository {
  /// Insert, or update `system_external_id` and `metadata` of the row with
  /// the same (`system_id`, `system_internal_id`, `regime_entity_id`).
  fn upsert_document_header(
    &self,
    header: NewDocumentHeader,
  ) -> impl Future<Output = Result<DocumentHeader, Self::Error>> + Send + '_;

  fn find_document_header(
    &self,
    document_id: Uuid,
  ) -> impl Future<Output = Result<Option<DocumentHeader>, Self::Error>> + Send + '_;

  fn find_document_headers<'a>(
    &'a self,
    query: &'a DocumentQuery,
  ) -> impl Future<Output = Result<Vec<DocumentHeader>, Self::Error>> + Send + 'a;

  fn delete_document_header(
    &self,
    document_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Everything ──────────────────────────────────────────────────────────────

/// A backend implementing every repository.
pub trait CrmStore:
  CompanyRepository
  + ContactRepository
  + AddressRepository
  + RoleRepository
  + CompanyAddressRepository
  + CompanyContactRepository
  + InvoiceAccountRepository
  + DocumentRepository
  + TestDataRepository
  + EntityRepository
  + EntityRoleRepository
  + DocumentHeaderRepository
{
}

impl<T> CrmStore for T where
  T: CompanyRepository
    + ContactRepository
    + AddressRepository
    + RoleRepository
    + CompanyAddressRepository
    + CompanyContactRepository
    + InvoiceAccountRepository
    + DocumentRepository
    + TestDataRepository
    + EntityRepository
    + EntityRoleRepository
    + DocumentHeaderRepository
{
}
