//! Document headers: search, upsert, fetch and delete.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  error::translate_write_error,
  filter::{
    self, DocumentHeaderFilter, DocumentHeaderSort, Pagination,
    RawDocumentFilter, RawDocumentSort,
  },
  models::document_header::{DocumentHeader, NewDocumentHeader},
  store::{DocumentHeaderRepository, EntityRoleRepository},
  validate::{Validator, optional_string},
};

/// Body of `POST /documentHeader`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentHeaderPayload {
  pub regime_entity_id:   Option<String>,
  pub system_id:          Option<String>,
  pub system_internal_id: Option<String>,
  pub system_external_id: Option<String>,
  pub document_name:      Option<String>,
  /// Either a JSON object or a string holding one.
  pub metadata:           Option<serde_json::Value>,
  pub company_entity_id:  Option<String>,
  pub verified:           Option<i64>,
  pub verification_id:    Option<String>,
}

impl DocumentHeaderPayload {
  pub fn validate(self) -> Result<NewDocumentHeader> {
    let mut v = Validator::default();
    let regime_entity_id =
      v.guid("regime_entity_id", self.regime_entity_id.as_deref().unwrap_or_default());
    let system_id = v.required_string("system_id", self.system_id);
    let system_internal_id = v.required_string("system_internal_id", self.system_internal_id);
    let system_external_id = v.required_string("system_external_id", self.system_external_id);
    let company_entity_id =
      v.optional_guid("company_entity_id", self.company_entity_id.as_deref());
    let verification_id = v.optional_guid("verification_id", self.verification_id.as_deref());
    let metadata = match self.metadata {
      None => serde_json::json!({}),
      Some(serde_json::Value::String(s)) => match serde_json::from_str(&s) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        _ => {
          v.reject("metadata", "must be a JSON object");
          serde_json::Value::Null
        }
      },
      Some(value @ serde_json::Value::Object(_)) => value,
      Some(_) => {
        v.reject("metadata", "must be a JSON object");
        serde_json::Value::Null
      }
    };
    v.finish("Document header not valid")?;
    Ok(NewDocumentHeader {
      regime_entity_id,
      system_id,
      system_internal_id,
      system_external_id,
      document_name: optional_string(self.document_name),
      metadata,
      company_entity_id,
      verified: self.verified,
      verification_id,
    })
  }
}

/// Check, compose and run a document-header search.
pub async fn find_document_headers<S>(
  store: &S,
  filter: RawDocumentFilter,
  sort: RawDocumentSort,
  pagination: Option<Pagination>,
) -> Result<Vec<DocumentHeader>>
where
  S: EntityRoleRepository + DocumentHeaderRepository,
{
  let filter = DocumentHeaderFilter::try_from(filter)?;
  let sort = DocumentHeaderSort::try_from(sort)?;
  let query = filter::compose(store, filter, sort, pagination).await?;
  store
    .find_document_headers(&query)
    .await
    .map_err(Error::store)
}

pub async fn upsert_document_header<S>(
  store: &S,
  payload: DocumentHeaderPayload,
) -> Result<DocumentHeader>
where
  S: DocumentHeaderRepository,
{
  let header = store
    .upsert_document_header(payload.validate()?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(document_id = %header.document_id, system_internal_id = %header.system_internal_id, "document header upserted");
  Ok(header)
}

pub async fn get_document_header<S>(store: &S, document_id: Uuid) -> Result<Option<DocumentHeader>>
where
  S: DocumentHeaderRepository,
{
  store
    .find_document_header(document_id)
    .await
    .map_err(Error::store)
}

pub async fn delete_document_header<S>(store: &S, document_id: Uuid) -> Result<bool>
where
  S: DocumentHeaderRepository,
{
  store
    .delete_document_header(document_id)
    .await
    .map_err(translate_write_error)
}
