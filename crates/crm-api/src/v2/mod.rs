//! The v2 surface. Bodies and responses are camelCase JSON; creates answer
//! `201`, deletes `204`.

pub mod addresses;
pub mod companies;
pub mod contacts;
pub mod documents;
pub mod invoice_accounts;
pub mod roles;
pub mod test_data;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use crm_core::store::CrmStore;

pub fn router<S>() -> Router<Arc<S>>
where
  S: CrmStore + 'static,
{
  Router::new()
    // Companies
    .route("/companies", post(companies::create::<S>))
    .route("/companies/search", get(companies::search::<S>))
    .route(
      "/companies/{id}",
      get(companies::get_one::<S>).delete(companies::delete_one::<S>),
    )
    .route(
      "/companies/{id}/addresses",
      get(companies::list_addresses::<S>).post(companies::add_address::<S>),
    )
    .route(
      "/companies/{id}/contacts",
      get(companies::list_contacts::<S>).post(companies::add_contact::<S>),
    )
    .route("/company-addresses/{id}", delete(companies::delete_address::<S>))
    .route("/company-contacts/{id}", delete(companies::delete_contact::<S>))
    // Contacts
    .route("/contacts", get(contacts::list::<S>).post(contacts::create::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>).delete(contacts::delete_one::<S>),
    )
    // Addresses
    .route("/addresses", post(addresses::create::<S>))
    .route(
      "/addresses/{id}",
      get(addresses::get_one::<S>).delete(addresses::delete_one::<S>),
    )
    // Roles
    .route("/roles", post(roles::create::<S>))
    .route("/roles/{name}", get(roles::get_one::<S>))
    // Invoice accounts
    .route(
      "/invoice-accounts",
      get(invoice_accounts::list::<S>).post(invoice_accounts::create::<S>),
    )
    .route("/invoice-accounts/next-number", get(invoice_accounts::next_number::<S>))
    .route(
      "/invoice-accounts/{id}",
      get(invoice_accounts::get_one::<S>).delete(invoice_accounts::delete_one::<S>),
    )
    .route("/invoice-accounts/{id}/addresses", post(invoice_accounts::add_address::<S>))
    // Documents
    .route("/documents", get(documents::list::<S>).post(documents::create::<S>))
    // Test data
    .route("/test-data", delete(test_data::delete_all::<S>))
}
