//! Handlers for `/companies`, `/company-addresses` and `/company-contacts`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/companies` | Body: [`CompanyPayload`] |
//! | `GET`    | `/companies/search` | `?name=` partial, case-insensitive |
//! | `GET`    | `/companies/{id}` | 404 if not found |
//! | `DELETE` | `/companies/{id}` | 422 while addresses, contacts or accounts refer to it |
//! | `GET`    | `/companies/{id}/addresses` | Each with its address and role |
//! | `POST`   | `/companies/{id}/addresses` | Body: [`CompanyAddressPayload`] |
//! | `GET`    | `/companies/{id}/contacts` | Each with its contact and role |
//! | `POST`   | `/companies/{id}/contacts` | Body: [`CompanyContactPayload`] |
//! | `DELETE` | `/company-addresses/{id}` | |
//! | `DELETE` | `/company-contacts/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use crm_core::{
  models::company::{Company, CompanyAddressDetail, CompanyContactDetail},
  services::companies::{
    self, CompanyAddressPayload, CompanyContactPayload, CompanyPayload,
  },
  store::CrmStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

fn deleted(found: bool, what: &str, id: Uuid) -> Result<StatusCode, ApiError> {
  if found {
    tracing::info!(%id, "{what} deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("{what} not found {id}")))
  }
}

/// `POST /companies`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CompanyPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let company = companies::create_company(store.as_ref(), body.validate()?).await?;
  Ok((StatusCode::CREATED, Json(company)))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub name: String,
}

/// `GET /companies/search?name=`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Company>>, ApiError>
where
  S: CrmStore,
{
  let found = companies::search_companies_by_name(store.as_ref(), &params.name).await?;
  Ok(Json(found))
}

/// `GET /companies/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Company>, ApiError>
where
  S: CrmStore,
{
  let company = companies::get_company(store.as_ref(), id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Company not found {id}")))?;
  Ok(Json(company))
}

/// `DELETE /companies/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  deleted(companies::delete_company(store.as_ref(), id).await?, "Company", id)
}

// ─── Addresses ───────────────────────────────────────────────────────────────

/// `GET /companies/{id}/addresses`
pub async fn list_addresses<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CompanyAddressDetail>>, ApiError>
where
  S: CrmStore,
{
  Ok(Json(companies::get_addresses(store.as_ref(), id).await?))
}

/// `POST /companies/{id}/addresses`
pub async fn add_address<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CompanyAddressPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let (address_id, association) = body.validate()?;
  let company_address = companies::add_address(
    store.as_ref(),
    id,
    address_id,
    &association.role_name,
    association.terms,
    association.is_test,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(company_address)))
}

/// `DELETE /company-addresses/{id}`
pub async fn delete_address<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  deleted(
    companies::delete_company_address(store.as_ref(), id).await?,
    "Company address",
    id,
  )
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// `GET /companies/{id}/contacts`
pub async fn list_contacts<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CompanyContactDetail>>, ApiError>
where
  S: CrmStore,
{
  Ok(Json(companies::get_contacts(store.as_ref(), id).await?))
}

/// `POST /companies/{id}/contacts`
pub async fn add_contact<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CompanyContactPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrmStore,
{
  let (contact_id, association) = body.validate()?;
  let company_contact = companies::add_contact(
    store.as_ref(),
    id,
    contact_id,
    &association.role_name,
    association.terms,
    association.is_test,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(company_contact)))
}

/// `DELETE /company-contacts/{id}`
pub async fn delete_contact<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CrmStore,
{
  deleted(
    companies::delete_company_contact(store.as_ref(), id).await?,
    "Company contact",
    id,
  )
}
