//! Handlers for `/documents` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::document::Document,
  services::documents::{self, DocumentPayload},
  store::CrmStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub regime:        String,
  pub document_type: String,
  pub document_ref:  String,
}

/// `GET /documents?regime=water&documentType=abstraction_licence&documentRef=01/115`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, ApiError>
where
  S: CrmStore,
{
  let (regime, document_type) =
    documents::parse_document_ref_query(&params.regime, &params.document_type)?;
  let found =
    documents::get_documents(store.as_ref(), regime, document_type, &params.document_ref).await?;
  Ok(Json(found))
}

/// `POST /documents`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<DocumentPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let document = documents::create_document(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(document)))
}
