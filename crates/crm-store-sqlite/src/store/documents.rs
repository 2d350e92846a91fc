//! `documents`, plus the test-data sweep across every v2 table.

use chrono::Utc;
use crm_core::{
  models::document::{Document, DocumentType, NewDocument, Regime},
  store::{DeletedTestData, DocumentRepository, TestDataRepository},
};
use uuid::Uuid;

use super::SqliteStore;
use crate::{
  Result,
  encode::{RawDocument, encode_date, encode_dt, encode_uuid},
};

impl DocumentRepository for SqliteStore {
  async fn create_document(&self, document: NewDocument) -> Result<Document> {
    let document = Document {
      document_id:   Uuid::new_v4(),
      regime:        document.regime,
      document_type: document.document_type,
      document_ref:  document.document_ref,
      status:        document.status,
      version:       document.version,
      start_date:    document.dates.start_date,
      end_date:      document.dates.end_date,
      is_test:       document.is_test,
      date_created:  Utc::now(),
    };

    self
      .execute(
        "INSERT INTO documents
           (document_id, regime, document_type, document_ref, status, version,
            start_date, end_date, is_test, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        vec![
          encode_uuid(document.document_id).into(),
          document.regime.as_ref().to_owned().into(),
          document.document_type.as_ref().to_owned().into(),
          document.document_ref.clone().into(),
          document.status.as_ref().to_owned().into(),
          document.version.into(),
          encode_date(document.start_date).into(),
          document.end_date.map(encode_date).into(),
          document.is_test.into(),
          encode_dt(document.date_created).into(),
        ],
      )
      .await?;

    Ok(document)
  }

  async fn find_documents_by_ref(
    &self,
    regime: Regime,
    document_type: DocumentType,
    document_ref: &str,
  ) -> Result<Vec<Document>> {
    self
      .fetch(
        format!(
          "SELECT {} FROM documents
           WHERE regime = ?1 AND document_type = ?2 AND document_ref = ?3
           ORDER BY version, start_date",
          RawDocument::COLUMNS.join(", ")
        ),
        vec![
          regime.as_ref().to_owned().into(),
          document_type.as_ref().to_owned().into(),
          document_ref.to_owned().into(),
        ],
        |row| RawDocument::read(row, 0),
      )
      .await?
      .into_iter()
      .map(RawDocument::into_document)
      .collect()
  }
}

// ─── Test data ───────────────────────────────────────────────────────────────

impl TestDataRepository for SqliteStore {
  /// Runs in one transaction: either every test row goes or none does.
  async fn delete_test_data(&self) -> Result<DeletedTestData> {
    let deleted = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let sweep = |table: &str| -> rusqlite::Result<u64> {
          let n = tx.execute(&format!("DELETE FROM {table} WHERE is_test = 1"), [])?;
          Ok(n as u64)
        };
        let deleted = DeletedTestData {
          company_addresses:         sweep("company_addresses")?,
          company_contacts:          sweep("company_contacts")?,
          invoice_account_addresses: sweep("invoice_account_addresses")?,
          invoice_accounts:          sweep("invoice_accounts")?,
          documents:                 sweep("documents")?,
          companies:                 sweep("companies")?,
          contacts:                  sweep("contacts")?,
          addresses:                 sweep("addresses")?,
        };
        tx.commit()?;
        Ok(deleted)
      })
      .await?;
    Ok(deleted)
  }
}
