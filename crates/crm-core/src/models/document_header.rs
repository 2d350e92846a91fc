use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A licence document header as held in `crm.document_header`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
  pub document_id:        Uuid,
  pub regime_entity_id:   Uuid,
  pub system_id:          String,
  pub system_internal_id: String,
  pub system_external_id: String,
  pub document_name:      Option<String>,
  /// Free-form; the `Expires` key is sortable.
  pub metadata:           serde_json::Value,
  pub company_entity_id:  Option<Uuid>,
  pub verified:           Option<i64>,
  pub verification_id:    Option<Uuid>,
}

/// Input to the document-header upsert.
///
/// Rows are keyed on (`system_id`, `system_internal_id`, `regime_entity_id`);
/// when the key already exists only `system_external_id` and `metadata` are
/// overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocumentHeader {
  pub regime_entity_id:   Uuid,
  pub system_id:          String,
  pub system_internal_id: String,
  pub system_external_id: String,
  pub document_name:      Option<String>,
  pub metadata:           serde_json::Value,
  pub company_entity_id:  Option<Uuid>,
  pub verified:           Option<i64>,
  pub verification_id:    Option<Uuid>,
}
