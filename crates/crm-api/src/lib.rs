//! JSON REST API for the CRM.
//!
//! Exposes an axum [`Router`] backed by any [`crm_core::store::CrmStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! Two surfaces are mounted side by side:
//!
//! - [`v1`] under `/crm/{version}`: entities, entity roles and document
//!   headers, wrapped in a `{"data": .., "error": null}` envelope;
//! - [`v2`] under `/crm/2.0`: companies, contacts, addresses, roles, invoice
//!   accounts and documents as plain camelCase JSON.

pub mod error;
pub mod v1;
pub mod v2;

use std::sync::Arc;

use axum::Router;
use crm_core::store::CrmStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// `version` is the path segment the v1 surface is mounted at, e.g. `"1.0"`.
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, version: &str) -> Router<()>
where
  S: CrmStore + 'static,
{
  Router::new()
    .nest(&format!("/crm/{version}"), v1::router::<S>())
    .nest("/crm/2.0", v2::router::<S>())
    .with_state(store)
}

#[cfg(test)]
mod tests;
