use serde::Deserialize;

use crate::{
  Error, Result,
  error::translate_write_error,
  models::{
    DateRange,
    document::{Document, DocumentStatus, DocumentType, NewDocument, Regime},
  },
  store::DocumentRepository,
  validate::Validator,
};

/// Body of `POST /documents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
  pub regime:        Option<String>,
  pub document_type: Option<String>,
  pub document_ref:  Option<String>,
  pub status:        Option<String>,
  pub version:       Option<i64>,
  pub start_date:    Option<String>,
  pub end_date:      Option<String>,
  pub is_test:       Option<bool>,
}

impl DocumentPayload {
  pub fn validate(self) -> Result<NewDocument> {
    let mut v = Validator::default();
    let regime: Regime = required_one_of(&mut v, "regime", self.regime.as_deref());
    let document_type: DocumentType =
      required_one_of(&mut v, "documentType", self.document_type.as_deref());
    let document_ref = v.required_string("documentRef", self.document_ref);
    let status: DocumentStatus = required_one_of(&mut v, "status", self.status.as_deref());
    let version = match self.version {
      Some(version) => v.non_negative("version", version),
      None => {
        v.reject("version", "is required");
        0
      }
    };
    let start_date = v.start_date("startDate", self.start_date.as_deref());
    let end_date = v.end_date("endDate", self.end_date.as_deref(), start_date);
    v.finish("Document not valid")?;
    Ok(NewDocument {
      regime,
      document_type,
      document_ref,
      status,
      version,
      dates: DateRange { start_date, end_date },
      is_test: self.is_test.unwrap_or(false),
    })
  }
}

fn required_one_of<T>(v: &mut Validator, path: &str, value: Option<&str>) -> T
where
  T: std::str::FromStr + strum::VariantNames + Default,
{
  match value {
    Some(value) => v.one_of(path, value),
    None => {
      v.reject(path, "is required");
      T::default()
    }
  }
}

/// Check the lookup parameters of `GET /documents`.
pub fn parse_document_ref_query(
  regime: &str,
  document_type: &str,
) -> Result<(Regime, DocumentType)> {
  let mut v = Validator::default();
  let regime = v.one_of("regime", regime);
  let document_type = v.one_of("documentType", document_type);
  v.finish("Document query not valid")?;
  Ok((regime, document_type))
}

pub async fn create_document<S>(store: &S, payload: DocumentPayload) -> Result<Document>
where
  S: DocumentRepository,
{
  let document = store
    .create_document(payload.validate()?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(document_id = %document.document_id, document_ref = %document.document_ref, "document created");
  Ok(document)
}

pub async fn get_documents<S>(
  store: &S,
  regime: Regime,
  document_type: DocumentType,
  document_ref: &str,
) -> Result<Vec<Document>>
where
  S: DocumentRepository,
{
  store
    .find_documents_by_ref(regime, document_type, document_ref)
    .await
    .map_err(Error::store)
}
