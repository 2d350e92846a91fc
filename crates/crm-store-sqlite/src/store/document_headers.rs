//! `document_header`, including the composed-filter query.

use crm_core::{
  filter::DocumentQuery,
  models::document_header::{DocumentHeader, NewDocumentHeader},
  store::DocumentHeaderRepository,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use super::SqliteStore;
use crate::{
  Result,
  encode::{RawDocumentHeader, encode_json, encode_uuid},
  query::compile,
};

impl DocumentHeaderRepository for SqliteStore {
  async fn upsert_document_header(&self, header: NewDocumentHeader) -> Result<DocumentHeader> {
    let params: Vec<rusqlite::types::Value> = vec![
      encode_uuid(Uuid::new_v4()).into(),
      encode_uuid(header.regime_entity_id).into(),
      header.system_id.into(),
      header.system_internal_id.into(),
      header.system_external_id.into(),
      header.document_name.into(),
      encode_json(&header.metadata)?.into(),
      header.company_entity_id.map(encode_uuid).into(),
      header.verified.into(),
      header.verification_id.map(encode_uuid).into(),
    ];
    let select = format!(
      "SELECT {} FROM document_header
       WHERE system_id = ?1 AND system_internal_id = ?2 AND regime_entity_id = ?3",
      RawDocumentHeader::COLUMNS.join(", ")
    );

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO document_header
             (document_id, regime_entity_id, system_id, system_internal_id,
              system_external_id, document_name, metadata, company_entity_id,
              verified, verification_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT (system_id, system_internal_id, regime_entity_id) DO UPDATE SET
             system_external_id = excluded.system_external_id,
             metadata           = excluded.metadata",
          rusqlite::params_from_iter(params.iter()),
        )?;
        let raw = tx.query_row(
          &select,
          rusqlite::params![&params[2], &params[3], &params[1]],
          |row| RawDocumentHeader::read(row, 0),
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_document_header()
  }

  async fn find_document_header(&self, document_id: Uuid) -> Result<Option<DocumentHeader>> {
    let id_str = encode_uuid(document_id);
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {} FROM document_header WHERE document_id = ?1",
              RawDocumentHeader::COLUMNS.join(", ")
            ),
            rusqlite::params![id_str],
            |row| RawDocumentHeader::read(row, 0),
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawDocumentHeader::into_document_header).transpose()
  }

  async fn find_document_headers(&self, query: &DocumentQuery) -> Result<Vec<DocumentHeader>> {
    let compiled = compile(query);
    tracing::trace!(sql = %compiled.sql, params = compiled.params.len(), "document header query");

    self
      .fetch(compiled.sql, compiled.params, |row| RawDocumentHeader::read(row, 0))
      .await?
      .into_iter()
      .map(RawDocumentHeader::into_document_header)
      .collect()
  }

  async fn delete_document_header(&self, document_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM document_header WHERE document_id = ?1", vec![
        encode_uuid(document_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}
