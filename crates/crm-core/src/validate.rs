//! Field-level validation shared by request handlers and services.
//!
//! A [`Validator`] runs one check per field and collects every failure, so
//! a caller sees all problems with a payload at once:
//!
//! ```rust
//! use crm_core::validate::Validator;
//!
//! let mut v = Validator::default();
//! let number = v.invoice_account_number("invoiceAccountNumber", "A12345678A");
//! let start  = v.date("startDate", "2020-04-01");
//! v.finish("Invoice account not valid").unwrap();
//! # let _ = (number, start);
//! ```
//!
//! Each check returns a placeholder value when it fails. The values must not
//! be used unless [`Validator::finish`] succeeds.

use std::{str::FromStr, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use strum::VariantNames;
use uuid::Uuid;

use crate::{Error, Result, error::ValidationDetail};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static INVOICE_ACCOUNT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[ABENSTWY][0-9]{8}A$").expect("invoice account number regex")
});

static REGION_CODE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[ABENSTWY]$").expect("region code regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex")
});

/// Trim a string, treating an empty result as absent.
pub fn optional_string(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

#[derive(Debug, Default)]
pub struct Validator {
  details: Vec<ValidationDetail>,
}

impl Validator {
  pub fn reject(&mut self, path: &str, message: impl Into<String>) {
    self.details.push(ValidationDetail::new(path, message));
  }

  pub fn is_valid(&self) -> bool { self.details.is_empty() }

  /// Fail with [`Error::EntityValidation`] if any check failed.
  pub fn finish(self, message: &str) -> Result<()> {
    if self.details.is_empty() {
      Ok(())
    } else {
      Err(Error::EntityValidation {
        message: message.to_owned(),
        details: self.details,
      })
    }
  }

  // ── Identifiers ─────────────────────────────────────────────────────────

  pub fn guid(&mut self, path: &str, value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap_or_else(|_| {
      self.reject(path, "must be a valid GUID");
      Uuid::nil()
    })
  }

  pub fn optional_guid(&mut self, path: &str, value: Option<&str>) -> Option<Uuid> {
    value.map(|v| self.guid(path, v))
  }

  // ── Dates ───────────────────────────────────────────────────────────────

  pub fn date(&mut self, path: &str, value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|_| {
      self.reject(path, "must be a date in the format YYYY-MM-DD");
      NaiveDate::MIN
    })
  }

  /// A required start date.
  pub fn start_date(&mut self, path: &str, value: Option<&str>) -> NaiveDate {
    match value {
      Some(v) => self.date(path, v),
      None => {
        self.reject(path, "is required");
        NaiveDate::MIN
      }
    }
  }

  /// An optional end date that may not precede `start`.
  pub fn end_date(
    &mut self,
    path: &str,
    value: Option<&str>,
    start: NaiveDate,
  ) -> Option<NaiveDate> {
    let end = self.date(path, value?);
    if end < start {
      self.reject(path, "must be on or after the start date");
    }
    Some(end)
  }

  // ── Strings ─────────────────────────────────────────────────────────────

  /// A required string, trimmed; empty counts as missing.
  pub fn required_string(&mut self, path: &str, value: Option<String>) -> String {
    optional_string(value).unwrap_or_else(|| {
      self.reject(path, "is required");
      String::new()
    })
  }

  pub fn email(&mut self, path: &str, value: &str) -> String {
    if !EMAIL.is_match(value) {
      self.reject(path, "must be a valid email");
    }
    value.to_owned()
  }

  fn pattern(&mut self, path: &str, value: &str, re: &Regex) -> String {
    if !re.is_match(value) {
      self.reject(path, format!("must match the pattern {}", re.as_str()));
    }
    value.to_owned()
  }

  pub fn invoice_account_number(&mut self, path: &str, value: &str) -> String {
    self.pattern(path, value, &INVOICE_ACCOUNT_NUMBER)
  }

  pub fn region_code(&mut self, path: &str, value: &str) -> String {
    self.pattern(path, value, &REGION_CODE)
  }

  // ── Closed sets ─────────────────────────────────────────────────────────

  /// One of the serialised names of `T`.
  pub fn one_of<T>(&mut self, path: &str, value: &str) -> T
  where
    T: FromStr + VariantNames + Default,
  {
    value.parse().unwrap_or_else(|_| {
      self.reject(path, format!("must be one of [{}]", T::VARIANTS.join(", ")));
      T::default()
    })
  }

  /// Like [`one_of`](Self::one_of), but `None` yields the default.
  pub fn one_of_or_default<T>(&mut self, path: &str, value: Option<&str>) -> T
  where
    T: FromStr + VariantNames + Default,
  {
    value.map(|v| self.one_of(path, v)).unwrap_or_default()
  }

  // ── Numbers ─────────────────────────────────────────────────────────────

  pub fn non_negative(&mut self, path: &str, value: i64) -> i64 {
    if value < 0 {
      self.reject(path, "must be greater than or equal to 0");
    }
    value
  }
}
