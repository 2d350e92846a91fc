use chrono::Utc;
use uuid::Uuid;

use super::mock::{MockError, MockStore, address, company, contact, date, role};
use crate::{
  Error,
  models::{
    DateRange,
    company::{CompanyAddress, CompanyAddressDetail, CompanyContact, CompanyContactDetail, CompanyType},
  },
  services::{AssociationTerms, companies},
};

fn terms() -> AssociationTerms {
  AssociationTerms { dates: DateRange::starting(date("2020-01-01")), is_default: false }
}

fn store() -> (MockStore, Uuid, Uuid) {
  let company_id = Uuid::new_v4();
  let r = role("billing");
  let role_id = r.role_id;
  (MockStore::with_role_and_company(r, company(company_id)), company_id, role_id)
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_role_id_returns_the_role_id() {
  let (s, _, role_id) = store();
  assert_eq!(companies::get_role_id(&s, "billing").await.unwrap(), role_id);
  assert_eq!(s.get(|st| st.role_lookups.clone()), ["billing"]);
}

#[tokio::test]
async fn get_role_id_fails_when_no_role_is_found() {
  let (s, _, _) = store();
  s.set(|st| st.role = None);

  let err = companies::get_role_id(&s, "test-role-name").await.unwrap_err();
  assert!(matches!(err, Error::EntityValidation { .. }));
  assert_eq!(err.to_string(), "Role with name: test-role-name not found");
}

// ─── Creating companies ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_person_sets_type_and_test_flag() {
  let (s, _, _) = store();
  companies::create_person(&s, "test-name".into(), true).await.unwrap();
  companies::create_person(&s, "test-name".into(), false).await.unwrap();

  let created = s.get(|st| st.created_companies.clone());
  assert_eq!(created[0].kind, CompanyType::Person);
  assert_eq!(created[0].name, "test-name");
  assert!(created[0].is_test);
  assert!(!created[1].is_test);
}

#[tokio::test]
async fn create_organisation_defaults_number_and_type_to_null() {
  let (s, _, _) = store();
  let result = companies::create_organisation(&s, "test-name".into(), None, None, false)
    .await
    .unwrap();
  assert_eq!(result.kind, CompanyType::Organisation);

  let created = s.get(|st| st.created_companies[0].clone());
  assert_eq!(created.company_number, None);
  assert_eq!(created.organisation_type, None);
  assert!(!created.is_test);
}

#[tokio::test]
async fn create_organisation_passes_number_and_type() {
  let (s, _, _) = store();
  companies::create_organisation(
    &s,
    "test-name".into(),
    Some("test-number".into()),
    Some("test-organisation-type".into()),
    true,
  )
  .await
  .unwrap();

  let created = s.get(|st| st.created_companies[0].clone());
  assert_eq!(created.company_number.as_deref(), Some("test-number"));
  assert_eq!(created.organisation_type.as_deref(), Some("test-organisation-type"));
  assert!(created.is_test);
}

// ─── Adding associations ─────────────────────────────────────────────────────

#[tokio::test]
async fn add_address_resolves_role_and_persists() {
  let (s, company_id, role_id) = store();
  let address_id = Uuid::new_v4();

  let created = companies::add_address(&s, company_id, address_id, "billing", terms(), true)
    .await
    .unwrap();
  assert_eq!(created.role_id, role_id);

  let input = s.get(|st| st.created_company_addresses[0].clone());
  assert_eq!(input.company_id, company_id);
  assert_eq!(input.address_id, address_id);
  assert_eq!(input.role_id, role_id);
  assert_eq!(input.dates.start_date, date("2020-01-01"));
  assert!(input.is_test);
}

#[tokio::test]
async fn add_address_unknown_role_is_a_validation_error() {
  let (s, company_id, _) = store();
  s.set(|st| st.role = None);

  let err = companies::add_address(&s, company_id, Uuid::new_v4(), "nope", terms(), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EntityValidation { .. }));
  assert_eq!(err.to_string(), "Role with name: nope not found");
  assert!(s.get(|st| st.created_company_addresses.is_empty()));
}

#[tokio::test]
async fn add_address_unique_violation_is_translated() {
  let (s, company_id, _) = store();
  s.set(|st| st.write_error = Some(MockError::new("duplicate key", Some("23505"))));

  let err = companies::add_address(&s, company_id, Uuid::new_v4(), "billing", terms(), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UniqueConstraintViolation(_)));
}

#[tokio::test]
async fn add_address_unknown_error_is_rethrown_unchanged() {
  let (s, company_id, _) = store();
  s.set(|st| st.write_error = Some(MockError::new("oops", None)));

  let err = companies::add_address(&s, company_id, Uuid::new_v4(), "billing", terms(), false)
    .await
    .unwrap_err();
  assert_eq!(err.to_string(), "oops");
  let Error::Store(inner) = err else { panic!("expected a store error") };
  assert!(inner.downcast_ref::<MockError>().is_some());
}

#[tokio::test]
async fn add_contact_persists_non_test_record() {
  let (s, company_id, role_id) = store();
  let contact_id = Uuid::new_v4();

  companies::add_contact(&s, company_id, contact_id, "billing", terms(), false)
    .await
    .unwrap();

  let input = s.get(|st| st.created_company_contacts[0].clone());
  assert_eq!(input.contact_id, contact_id);
  assert_eq!(input.role_id, role_id);
  assert!(!input.is_test);
}

#[tokio::test]
async fn add_contact_constraint_codes_are_translated() {
  let (s, company_id, _) = store();

  s.set(|st| st.write_error = Some(MockError::new("", Some("23505"))));
  let err = companies::add_contact(&s, company_id, Uuid::new_v4(), "billing", terms(), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UniqueConstraintViolation(_)));

  s.set(|st| st.write_error = Some(MockError::new("", Some("23503"))));
  let err = companies::add_contact(&s, company_id, Uuid::new_v4(), "billing", terms(), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ForeignKeyConstraintViolation(_)));

  s.set(|st| st.write_error = Some(MockError::new("check failed", Some("23514"))));
  let err = companies::add_contact(&s, company_id, Uuid::new_v4(), "billing", terms(), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Store(_)));
  assert_eq!(err.to_string(), "check failed");
}

// ─── Fetching associations ───────────────────────────────────────────────────

#[tokio::test]
async fn get_addresses_checks_the_company_exists() {
  let (s, company_id, role_id) = store();
  let address_id = Uuid::new_v4();
  let company_address_id = Uuid::new_v4();
  s.set(|st| {
    st.company_addresses = vec![CompanyAddressDetail {
      company_address: CompanyAddress {
        company_address_id,
        company_id,
        address_id,
        role_id,
        start_date: date("2020-01-01"),
        end_date: None,
        is_default: true,
        is_test: true,
        date_created: Utc::now(),
      },
      address: address(address_id),
      role: role("billing"),
    }]
  });

  let result = companies::get_addresses(&s, company_id).await.unwrap();
  assert_eq!(result[0].company_address.company_address_id, company_address_id);
  assert_eq!(s.get(|st| st.company_lookups.clone()), [company_id]);
}

#[tokio::test]
async fn get_addresses_missing_company_is_not_found() {
  let (s, _, _) = store();
  s.set(|st| st.company = None);
  let missing = Uuid::new_v4();

  let err = companies::get_addresses(&s, missing).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert_eq!(err.to_string(), format!("Company not found {missing}"));
}

#[tokio::test]
async fn get_contacts_returns_company_contacts() {
  let (s, company_id, role_id) = store();
  let contact_id = Uuid::new_v4();
  let company_contact_id = Uuid::new_v4();
  s.set(|st| {
    st.company_contacts = vec![CompanyContactDetail {
      company_contact: CompanyContact {
        company_contact_id,
        company_id,
        contact_id,
        role_id,
        start_date: date("2020-01-01"),
        end_date: None,
        is_default: false,
        is_test: true,
        date_created: Utc::now(),
      },
      contact: contact(contact_id),
      role: role("billing"),
    }]
  });

  let result = companies::get_contacts(&s, company_id).await.unwrap();
  assert_eq!(result[0].company_contact.company_contact_id, company_contact_id);
}

#[tokio::test]
async fn get_contacts_missing_company_is_not_found() {
  let (s, _, _) = store();
  s.set(|st| st.company = None);
  let missing = Uuid::new_v4();

  let err = companies::get_contacts(&s, missing).await.unwrap_err();
  assert_eq!(err.to_string(), format!("Company not found {missing}"));
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deletes_call_the_matching_repository() {
  let (s, company_id, _) = store();
  let ca = Uuid::new_v4();
  let cc = Uuid::new_v4();

  companies::delete_company(&s, company_id).await.unwrap();
  companies::delete_company_address(&s, ca).await.unwrap();
  companies::delete_company_contact(&s, cc).await.unwrap();

  assert_eq!(
    s.get(|st| st.deleted.clone()),
    [("company", company_id), ("company_address", ca), ("company_contact", cc)]
  );
}
