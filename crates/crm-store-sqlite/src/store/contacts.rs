//! `contacts`, `addresses` and `roles`.

use chrono::Utc;
use crm_core::{
  models::{
    address::{Address, NewAddress},
    contact::{Contact, NewContact},
    role::Role,
  },
  store::{AddressRepository, ContactRepository, RoleRepository},
};
use rusqlite::types::Value;
use uuid::Uuid;

use super::SqliteStore;
use crate::{
  Result,
  encode::{RawAddress, RawContact, RawRole, encode_dt, encode_uuid},
};

/// `?, ?, ?` for an `IN` list of `n` items.
pub(super) fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

impl ContactRepository for SqliteStore {
  async fn create_contact(&self, contact: NewContact) -> Result<Contact> {
    let now = Utc::now();
    let contact = Contact {
      contact_id:   Uuid::new_v4(),
      salutation:   contact.salutation,
      first_name:   contact.first_name,
      initials:     contact.initials,
      middle_name:  contact.middle_name,
      last_name:    contact.last_name,
      is_test:      contact.is_test,
      date_created: now,
      date_updated: now,
    };

    self
      .execute(
        "INSERT INTO contacts
           (contact_id, salutation, first_name, initials, middle_name, last_name,
            is_test, date_created, date_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        vec![
          encode_uuid(contact.contact_id).into(),
          contact.salutation.clone().into(),
          contact.first_name.clone().into(),
          contact.initials.clone().into(),
          contact.middle_name.clone().into(),
          contact.last_name.clone().into(),
          contact.is_test.into(),
          encode_dt(now).into(),
          encode_dt(now).into(),
        ],
      )
      .await?;

    Ok(contact)
  }

  async fn find_contact(&self, contact_id: Uuid) -> Result<Option<Contact>> {
    self
      .fetch_one(
        format!(
          "SELECT {} FROM contacts WHERE contact_id = ?1",
          RawContact::COLUMNS.join(", ")
        ),
        vec![encode_uuid(contact_id).into()],
        |row| RawContact::read(row, 0),
      )
      .await?
      .map(RawContact::into_contact)
      .transpose()
  }

  async fn find_contacts_by_ids(&self, contact_ids: Vec<Uuid>) -> Result<Vec<Contact>> {
    if contact_ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!(
      "SELECT {} FROM contacts WHERE contact_id IN ({}) ORDER BY last_name, contact_id",
      RawContact::COLUMNS.join(", "),
      placeholders(contact_ids.len()),
    );
    let params: Vec<Value> = contact_ids
      .into_iter()
      .map(|id| Value::Text(encode_uuid(id)))
      .collect();

    self
      .fetch(sql, params, |row| RawContact::read(row, 0))
      .await?
      .into_iter()
      .map(RawContact::into_contact)
      .collect()
  }

  async fn delete_contact(&self, contact_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM contacts WHERE contact_id = ?1", vec![
        encode_uuid(contact_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}

impl AddressRepository for SqliteStore {
  async fn create_address(&self, address: NewAddress) -> Result<Address> {
    let address = Address {
      address_id:   Uuid::new_v4(),
      address1:     address.address1,
      address2:     address.address2,
      address3:     address.address3,
      address4:     address.address4,
      town:         address.town,
      county:       address.county,
      postcode:     address.postcode,
      country:      address.country,
      uprn:         address.uprn,
      data_source:  address.data_source,
      is_test:      address.is_test,
      date_created: Utc::now(),
    };

    self
      .execute(
        "INSERT INTO addresses
           (address_id, address_1, address_2, address_3, address_4, town, county,
            postcode, country, uprn, data_source, is_test, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        vec![
          encode_uuid(address.address_id).into(),
          address.address1.clone().into(),
          address.address2.clone().into(),
          address.address3.clone().into(),
          address.address4.clone().into(),
          address.town.clone().into(),
          address.county.clone().into(),
          address.postcode.clone().into(),
          address.country.clone().into(),
          address.uprn.into(),
          address.data_source.as_ref().to_owned().into(),
          address.is_test.into(),
          encode_dt(address.date_created).into(),
        ],
      )
      .await?;

    Ok(address)
  }

  async fn find_address(&self, address_id: Uuid) -> Result<Option<Address>> {
    self
      .fetch_one(
        format!(
          "SELECT {} FROM addresses WHERE address_id = ?1",
          RawAddress::COLUMNS.join(", ")
        ),
        vec![encode_uuid(address_id).into()],
        |row| RawAddress::read(row, 0),
      )
      .await?
      .map(RawAddress::into_address)
      .transpose()
  }

  async fn delete_address(&self, address_id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM addresses WHERE address_id = ?1", vec![
        encode_uuid(address_id).into(),
      ])
      .await?;
    Ok(n > 0)
  }
}

impl RoleRepository for SqliteStore {
  async fn create_role(&self, name: &str) -> Result<Role> {
    let role = Role { role_id: Uuid::new_v4(), name: name.to_owned() };
    self
      .execute("INSERT INTO roles (role_id, name) VALUES (?1, ?2)", vec![
        encode_uuid(role.role_id).into(),
        role.name.clone().into(),
      ])
      .await?;
    Ok(role)
  }

  async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
    self
      .fetch_one(
        format!("SELECT {} FROM roles WHERE name = ?1", RawRole::COLUMNS.join(", ")),
        vec![name.to_owned().into()],
        |row| RawRole::read(row, 0),
      )
      .await?
      .map(RawRole::into_role)
      .transpose()
  }
}
