//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
};
use crm_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  api_router,
  error::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION},
};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store), "1.0")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(body) => builder
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

/// Percent-encode a query-string value.
fn q(value: &str) -> String {
  value
    .bytes()
    .map(|b| match b {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
      _ => format!("%{b:02X}"),
    })
    .collect()
}

// ─── v2: contacts ────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_without_last_name_is_rejected_with_details() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/crm/2.0/contacts", Some(json!({ "firstName": "Jo" }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["error"], "Contact not valid");
  assert_eq!(body["details"][0]["path"], "lastName");
}

#[tokio::test]
async fn contact_lifecycle() {
  let app = app().await;
  let (status, created) = send(
    &app,
    "POST",
    "/crm/2.0/contacts",
    Some(json!({ "salutation": "Dr", "firstName": "Jo", "lastName": "Bloggs", "isTest": true })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["contactId"].as_str().unwrap().to_owned();

  let (status, fetched) = send(&app, "GET", &format!("/crm/2.0/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["lastName"], "Bloggs");
  assert_eq!(fetched["isTest"], true);

  let (status, listed) = send(
    &app,
    "GET",
    &format!("/crm/2.0/contacts?ids={id},{}", Uuid::new_v4()),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let (status, _) = send(&app, "DELETE", &format!("/crm/2.0/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, "DELETE", &format!("/crm/2.0/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_list_is_a_bad_request() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/crm/2.0/contacts?ids=nope", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "nope is not a valid GUID");
}

// ─── v2: companies ───────────────────────────────────────────────────────────

#[tokio::test]
async fn company_addresses_resolve_roles_and_reject_duplicates() {
  let app = app().await;
  let (status, company) = send(
    &app,
    "POST",
    "/crm/2.0/companies",
    Some(json!({ "name": "Acme Water", "type": "organisation" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let company_id = company["companyId"].as_str().unwrap().to_owned();

  let (_, address) = send(
    &app,
    "POST",
    "/crm/2.0/addresses",
    Some(json!({ "address1": "1 Temple Quay", "postcode": "BS1 6EA" })),
  )
  .await;
  assert_eq!(address["dataSource"], "wrls");
  let link = json!({
    "addressId": address["addressId"],
    "roleName": "billing",
    "startDate": "2020-04-01",
  });
  let uri = format!("/crm/2.0/companies/{company_id}/addresses");

  let (status, body) = send(&app, "POST", &uri, Some(link.clone())).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["error"], "Role with name: billing not found");

  let (status, _) = send(&app, "POST", "/crm/2.0/roles", Some(json!({ "name": "billing" }))).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(&app, "POST", &uri, Some(link.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  let (status, body) = send(&app, "POST", &uri, Some(link)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body, json!({ "error": UNIQUE_VIOLATION }));

  let (status, listed) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed[0]["role"]["name"], "billing");
  assert_eq!(listed[0]["address"]["address1"], "1 Temple Quay");
  assert_eq!(listed[0]["startDate"], "2020-04-01");

  // Still referenced.
  let (status, body) = send(&app, "DELETE", &format!("/crm/2.0/companies/{company_id}"), None).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body, json!({ "error": FOREIGN_KEY_VIOLATION }));
}

#[tokio::test]
async fn duplicate_role_name_hides_database_text() {
  let app = app().await;
  let role = json!({ "name": "licence_holder" });
  let (status, _) = send(&app, "POST", "/crm/2.0/roles", Some(role.clone())).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(&app, "POST", "/crm/2.0/roles", Some(role)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], UNIQUE_VIOLATION);
  assert!(!body.to_string().contains("roles.name"));
}

#[tokio::test]
async fn document_header_pagination_defaults_missing_keys() {
  let app = app().await;
  seed_headers(&app, Uuid::new_v4()).await;

  let uri = format!("/crm/1.0/documentHeader?pagination={}", q(r#"{"page":1}"#));
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["pagination"], json!({ "page": 1, "perPage": 100 }));
  assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_company_is_not_found() {
  let app = app().await;
  let id = Uuid::new_v4();
  let (status, body) = send(&app, "GET", &format!("/crm/2.0/companies/{id}/contacts"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], format!("Company not found {id}"));
}

#[tokio::test]
async fn company_search_is_case_insensitive() {
  let app = app().await;
  for name in ["Acme Water", "Big Farm"] {
    send(&app, "POST", "/crm/2.0/companies", Some(json!({ "name": name, "type": "person" }))).await;
  }
  let (status, found) = send(&app, "GET", "/crm/2.0/companies/search?name=ACME", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(found.as_array().unwrap().len(), 1);
  assert_eq!(found[0]["type"], "person");
}

// ─── v2: invoice accounts ────────────────────────────────────────────────────

#[tokio::test]
async fn next_invoice_account_number() {
  let app = app().await;
  let (_, company) = send(
    &app,
    "POST",
    "/crm/2.0/companies",
    Some(json!({ "name": "Acme", "type": "organisation" })),
  )
  .await;
  let (status, _) = send(
    &app,
    "POST",
    "/crm/2.0/invoice-accounts",
    Some(json!({
      "companyId": company["companyId"],
      "invoiceAccountNumber": "A00000009A",
      "startDate": "2020-04-01",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, next) = send(&app, "GET", "/crm/2.0/invoice-accounts/next-number?region=A", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(next["invoiceAccountNumber"], "A00000010A");

  let (status, _) = send(&app, "GET", "/crm/2.0/invoice-accounts/next-number?region=Q", None).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── v2: test data ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_data_sweep_reports_counts() {
  let app = app().await;
  send(&app, "POST", "/crm/2.0/contacts", Some(json!({ "lastName": "Test", "isTest": true }))).await;
  send(&app, "POST", "/crm/2.0/contacts", Some(json!({ "lastName": "Real" }))).await;

  let (status, deleted) = send(&app, "DELETE", "/crm/2.0/test-data", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(deleted["contacts"], 1);
  assert_eq!(deleted["companies"], 0);
}

// ─── v1: document headers ────────────────────────────────────────────────────

async fn seed_headers(app: &Router, regime: Uuid) {
  for (internal, external) in [("1", "01/115"), ("2", "01/116"), ("3", "02/001")] {
    let (status, body) = send(
      app,
      "POST",
      "/crm/1.0/documentHeader",
      Some(json!({
        "regime_entity_id": regime.to_string(),
        "system_id": "permit-repo",
        "system_internal_id": internal,
        "system_external_id": external,
        "metadata": "{\"Expires\": \"20300101\"}",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["error"].is_null());
  }
}

#[tokio::test]
async fn document_header_search_by_string() {
  let app = app().await;
  seed_headers(&app, Uuid::new_v4()).await;

  let uri = format!(
    "/crm/1.0/documentHeader?filter={}&sort={}",
    q(r#"{"string":"01/11"}"#),
    q(r#"{"system_external_id":-1}"#),
  );
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<_> = body["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|h| h["system_external_id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, ["01/116", "01/115"]);
  assert_eq!(body["pagination"], json!({ "page": 1, "perPage": 100 }));
  assert_eq!(body["data"][0]["metadata"]["Expires"], "20300101");
}

#[tokio::test]
async fn document_header_filter_errors() {
  let app = app().await;

  let (status, _) = send(&app, "GET", "/crm/1.0/documentHeader?filter=nope", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let uri = format!("/crm/1.0/documentHeader?filter={}", q(r#"{"password":"x"}"#));
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["error"], "Filter not valid");

  let uri = format!("/crm/1.0/documentHeader?filter={}", q(r#"{"email":"nobody@example.com"}"#));
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Entity nobody@example.com not found");
}

#[tokio::test]
async fn document_header_get_and_delete() {
  let app = app().await;
  let (_, created) = send(
    &app,
    "POST",
    "/crm/1.0/documentHeader",
    Some(json!({
      "regime_entity_id": Uuid::new_v4().to_string(),
      "system_id": "permit-repo",
      "system_internal_id": "9",
      "system_external_id": "03/001",
    })),
  )
  .await;
  let id = created["data"]["document_id"].as_str().unwrap().to_owned();
  let uri = format!("/crm/1.0/documentHeader/{id}");

  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["system_external_id"], "03/001");

  let (status, body) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["document_id"], id.as_str());

  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── v1: entities ────────────────────────────────────────────────────────────

#[tokio::test]
async fn entity_roles_scope_document_search() {
  let app = app().await;
  let regime = Uuid::new_v4();
  seed_headers(&app, regime).await;
  seed_headers(&app, Uuid::new_v4()).await;

  let (status, entity) = send(
    &app,
    "POST",
    "/crm/1.0/entity",
    Some(json!({ "entity_nm": "jo@example.com", "entity_type": "individual" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let entity_id = entity["data"]["entity_id"].as_str().unwrap().to_owned();

  let roles_uri = format!("/crm/1.0/entity/{entity_id}/roles");
  let (status, body) = send(
    &app,
    "POST",
    &roles_uri,
    Some(json!({ "role": "user", "regime_entity_id": regime.to_string() })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["data"]["regime_entity_id"], regime.to_string());
  let role_id = body["data"]["entity_role_id"].as_str().unwrap().to_owned();

  let (_, roles) = send(&app, "GET", &roles_uri, None).await;
  assert_eq!(roles["data"].as_array().unwrap().len(), 1);

  let uri = format!(
    "/crm/1.0/documentHeader?filter={}",
    q(&json!({ "entity_id": entity_id }).to_string())
  );
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 3);

  let (status, _) = send(&app, "DELETE", &format!("{roles_uri}/{role_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn individual_entity_needs_an_email() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/crm/1.0/entity",
    Some(json!({ "entity_nm": "not an email", "entity_type": "individual" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["error"], "Entity not valid");
}
