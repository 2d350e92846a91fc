//! [`SqliteStore`], the SQLite implementation of the `crm_core` repositories.
//!
//! One file per group of tables; this module holds the connection and the
//! query helpers they share.

mod companies;
mod contacts;
mod document_headers;
mod documents;
mod entities;
mod invoice_accounts;

use std::path::Path;

use crm_core::store::Repository;
use rusqlite::{OptionalExtension as _, Row, types::Value};

use crate::{
  Result,
  schema::{SCHEMA, register_functions},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A CRM store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a query and read every row with `read`.
  async fn fetch<T, F>(&self, sql: String, params: Vec<Value>, read: F) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| read(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Like [`fetch`](Self::fetch) but for at most one row.
  async fn fetch_one<T, F>(&self, sql: String, params: Vec<Value>, read: F) -> Result<Option<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| read(row))
          .optional()?;
        Ok(row)
      })
      .await?;
    Ok(row)
  }

  /// Run a write and return the number of rows changed.
  async fn execute(&self, sql: &'static str, params: Vec<Value>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params_from_iter(params.iter()))?))
      .await?;
    Ok(changed)
  }
}

impl Repository for SqliteStore {
  type Error = crate::Error;
}
