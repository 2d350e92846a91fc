use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  error::translate_write_error,
  models::address::{Address, DataSource, NewAddress},
  store::AddressRepository,
  validate::{Validator, optional_string},
};

/// Body of `POST /addresses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
  pub address1:    Option<String>,
  pub address2:    Option<String>,
  pub address3:    Option<String>,
  pub address4:    Option<String>,
  pub town:        Option<String>,
  pub county:      Option<String>,
  pub postcode:    Option<String>,
  pub country:     Option<String>,
  pub uprn:        Option<i64>,
  pub data_source: Option<String>,
  pub is_test:     Option<bool>,
}

impl AddressPayload {
  pub fn validate(self) -> Result<NewAddress> {
    let mut v = Validator::default();
    let uprn = self.uprn.map(|u| v.non_negative("uprn", u));
    let data_source: DataSource = v.one_of_or_default("dataSource", self.data_source.as_deref());
    v.finish("Address not valid")?;
    Ok(NewAddress {
      address1: optional_string(self.address1),
      address2: optional_string(self.address2),
      address3: optional_string(self.address3),
      address4: optional_string(self.address4),
      town: optional_string(self.town),
      county: optional_string(self.county),
      postcode: optional_string(self.postcode),
      country: optional_string(self.country),
      uprn,
      data_source,
      is_test: self.is_test.unwrap_or(false),
    })
  }
}

pub async fn create_address<S>(store: &S, payload: AddressPayload) -> Result<Address>
where
  S: AddressRepository,
{
  let address = store
    .create_address(payload.validate()?)
    .await
    .map_err(translate_write_error)?;
  tracing::info!(address_id = %address.address_id, "address created");
  Ok(address)
}

pub async fn get_address<S>(store: &S, address_id: Uuid) -> Result<Option<Address>>
where
  S: AddressRepository,
{
  store.find_address(address_id).await.map_err(Error::store)
}

pub async fn delete_address<S>(store: &S, address_id: Uuid) -> Result<bool>
where
  S: AddressRepository,
{
  store.delete_address(address_id).await.map_err(translate_write_error)
}
