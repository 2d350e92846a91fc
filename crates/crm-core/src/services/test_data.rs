use crate::{
  Result,
  error::translate_write_error,
  store::{DeletedTestData, TestDataRepository},
};

/// Purge every row created by automated tests.
pub async fn delete_test_data<S>(store: &S) -> Result<DeletedTestData>
where
  S: TestDataRepository,
{
  let deleted = store
    .delete_test_data()
    .await
    .map_err(translate_write_error)?;
  tracing::info!(rows = deleted.total(), "test data deleted");
  Ok(deleted)
}
