//! The v1 surface: entities, entity roles and document headers.
//!
//! Every success body is an [`Envelope`].

pub mod document_headers;
pub mod entities;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use crm_core::{filter::Pagination, store::CrmStore};
use serde::Serialize;

/// `{"data": .., "error": null}`, plus `pagination` on lists.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub data:       T,
  pub error:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
  pub fn data(data: T) -> Self { Self { data, error: None, pagination: None } }

  pub fn page(data: T, pagination: Pagination) -> Self {
    Self { data, error: None, pagination: Some(pagination) }
  }
}

pub fn router<S>() -> Router<Arc<S>>
where
  S: CrmStore + 'static,
{
  Router::new()
    // Document headers
    .route(
      "/documentHeader",
      get(document_headers::list::<S>).post(document_headers::upsert::<S>),
    )
    .route(
      "/documentHeader/{id}",
      get(document_headers::get_one::<S>).delete(document_headers::delete_one::<S>),
    )
    // Entities
    .route("/entity", post(entities::create::<S>))
    .route("/entity/{entity_id}", get(entities::get_one::<S>))
    .route(
      "/entity/{entity_id}/roles",
      get(entities::list_roles::<S>).post(entities::create_role::<S>),
    )
    .route("/entity/{entity_id}/roles/{id}", delete(entities::delete_role::<S>))
}
