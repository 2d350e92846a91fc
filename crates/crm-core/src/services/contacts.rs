use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  error::translate_write_error,
  models::contact::{Contact, NewContact},
  store::ContactRepository,
  validate::{Validator, optional_string},
};

/// Body of `POST /contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
  pub salutation:  Option<String>,
  pub first_name:  Option<String>,
  pub initials:    Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub is_test:     Option<bool>,
}

impl ContactPayload {
  pub fn validate(self) -> Result<NewContact> {
    let mut v = Validator::default();
    let last_name = v.required_string("lastName", self.last_name);
    v.finish("Contact not valid")?;
    Ok(NewContact {
      salutation: optional_string(self.salutation),
      first_name: optional_string(self.first_name),
      initials: optional_string(self.initials),
      middle_name: optional_string(self.middle_name),
      last_name,
      is_test: self.is_test.unwrap_or(false),
    })
  }
}

pub async fn create_contact<S>(store: &S, payload: ContactPayload) -> Result<Contact>
where
  S: ContactRepository,
{
  let contact = store
    .create_contact(payload.validate()?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(contact_id = %contact.contact_id, "contact created");
  Ok(contact)
}

pub async fn get_contact<S>(store: &S, contact_id: Uuid) -> Result<Option<Contact>>
where
  S: ContactRepository,
{
  store.find_contact(contact_id).await.map_err(Error::store)
}

pub async fn get_contacts_by_ids<S>(store: &S, contact_ids: Vec<Uuid>) -> Result<Vec<Contact>>
where
  S: ContactRepository,
{
  store
    .find_contacts_by_ids(contact_ids)
    .await
    .map_err(Error::store)
}

pub async fn delete_contact<S>(store: &S, contact_id: Uuid) -> Result<bool>
where
  S: ContactRepository,
{
  store.delete_contact(contact_id).await.map_err(translate_write_error)
}
