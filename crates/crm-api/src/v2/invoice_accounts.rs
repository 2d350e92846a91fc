//! Handlers for `/invoice-accounts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/invoice-accounts` | `?ids=<id>,<id>`; each with its company and current addresses |
//! | `POST`   | `/invoice-accounts` | Body: [`InvoiceAccountPayload`] |
//! | `GET`    | `/invoice-accounts/next-number` | `?region=A` |
//! | `GET`    | `/invoice-accounts/{id}` | With its company and every address |
//! | `DELETE` | `/invoice-accounts/{id}` | |
//! | `POST`   | `/invoice-accounts/{id}/addresses` | Body: [`InvoiceAccountAddressPayload`] |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::invoice_account::InvoiceAccountDetail,
  services::invoice_accounts::{
    self, InvoiceAccountAddressPayload, InvoiceAccountPayload,
  },
  store::CrmStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, parse_id_list};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub ids: String,
}

/// `GET /invoice-accounts?ids=`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<InvoiceAccountDetail>>, ApiError>
where
  S: CrmStore,
{
  let ids = parse_id_list(&params.ids)?;
  let accounts =
    invoice_accounts::get_invoice_accounts_with_current_address(store.as_ref(), ids).await?;
  Ok(Json(accounts))
}

/// `POST /invoice-accounts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<InvoiceAccountPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let account = invoice_accounts::create_invoice_account(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /invoice-accounts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<InvoiceAccountDetail>, ApiError>
where
  S: CrmStore,
{
  let account = invoice_accounts::get_invoice_account(store.as_ref(), id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Invoice account not found {id}")))?;
  Ok(Json(account))
}

/// `DELETE /invoice-accounts/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  if invoice_accounts::delete_invoice_account(store.as_ref(), id).await? {
    tracing::info!(invoice_account_id = %id, "invoice account deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Invoice account not found {id}")))
  }
}

/// `POST /invoice-accounts/{id}/addresses`
pub async fn add_address<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<InvoiceAccountAddressPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let address = invoice_accounts::create_invoice_account_address(store.as_ref(), id, body).await?;
  Ok((StatusCode::CREATED, Json(address)))
}

// ─── Account numbers ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NextNumberParams {
  pub region: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumber {
  pub invoice_account_number: String,
}

/// `GET /invoice-accounts/next-number?region=`
pub async fn next_number<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<NextNumberParams>,
) -> Result<Json<NextNumber>, ApiError>
where
  S: CrmStore,
{
  let invoice_account_number =
    invoice_accounts::next_invoice_account_number(store.as_ref(), &params.region).await?;
  Ok(Json(NextNumber { invoice_account_number }))
}
