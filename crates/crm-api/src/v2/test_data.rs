//! `DELETE /test-data`: purge every row flagged `isTest`.

use std::sync::Arc;

use axum::{Json, extract::State};
use crm_core::{services::test_data, store::{CrmStore, DeletedTestData}};

use crate::error::ApiError;

pub async fn delete_all<S>(State(store): State<Arc<S>>) -> Result<Json<DeletedTestData>, ApiError>
where
  S: CrmStore,
{
  Ok(Json(test_data::delete_test_data(store.as_ref()).await?))
}
