use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub contact_id:   Uuid,
  pub salutation:   Option<String>,
  pub first_name:   Option<String>,
  pub initials:     Option<String>,
  pub middle_name:  Option<String>,
  pub last_name:    String,
  pub is_test:      bool,
  pub date_created: DateTime<Utc>,
  pub date_updated: DateTime<Utc>,
}

/// A validated contact ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
  pub salutation:  Option<String>,
  pub first_name:  Option<String>,
  pub initials:    Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   String,
  pub is_test:     bool,
}
