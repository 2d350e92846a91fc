//! Document-header search: from request parameters to a query.
//!
//! A request carries a loosely-shaped `filter` and `sort`. They are first
//! checked into [`DocumentHeaderFilter`] / [`DocumentHeaderSort`], whose
//! overflow keys must name real columns, and then [`compose`] resolves the
//! `email` and `entity_id` search terms to role scopes and builds a
//! [`DocumentQuery`] the store can execute directly.
//!
//! The predicate tree for a request with every search term looks like:
//!
//! ```text
//! AND(
//!   <column equalities...>,
//!   OR(system_external_id ILIKE '%s%', document_name ILIKE '%s%'),
//!   AND(
//!     OR(<scopes of the roles for `email`>),
//!     OR(<scopes of the roles for `entity_id`>),
//!   ),
//! )
//! ```

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  models::entity::{EntityRole, RoleScope},
  store::EntityRoleRepository,
  validate::Validator,
};

/// The metadata key that `document_expires` sorts on.
pub const EXPIRES_METADATA_KEY: &str = "Expires";

// ─── Columns and values ──────────────────────────────────────────────────────

/// Filterable and sortable columns of `crm.document_header`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr,
  EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentColumn {
  DocumentId,
  RegimeEntityId,
  CompanyEntityId,
  SystemId,
  SystemInternalId,
  SystemExternalId,
  DocumentName,
  Verified,
  VerificationId,
}

/// A scalar on the right-hand side of an equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
  Text(String),
  Integer(i64),
  Bool(bool),
  Uuid(Uuid),
}

impl FilterValue {
  /// Convert a JSON scalar. `Ok(None)` for `null`; `Err` for arrays, objects
  /// and non-integral numbers.
  fn from_json(value: serde_json::Value) -> std::result::Result<Option<Self>, String> {
    use serde_json::Value;
    match value {
      Value::Null => Ok(None),
      Value::Bool(b) => Ok(Some(Self::Bool(b))),
      Value::String(s) => Ok(Some(Self::Text(s))),
      Value::Number(n) => n
        .as_i64()
        .map(|i| Some(Self::Integer(i)))
        .ok_or_else(|| format!("{n} is not an integer")),
      Value::Array(_) | Value::Object(_) => Err("must be a scalar".to_owned()),
    }
  }
}

impl fmt::Display for FilterValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) => write!(f, "'{s}'"),
      Self::Integer(i) => write!(f, "{i}"),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Uuid(u) => write!(f, "'{u}'"),
    }
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

/// A boolean predicate tree over document-header columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
  Eq(DocumentColumn, FilterValue),
  IsNull(DocumentColumn),
  /// Case-insensitive `LIKE`; the pattern includes its own wildcards.
  ILike(DocumentColumn, String),
  Or(Vec<Predicate>),
  And(Vec<Predicate>),
}

impl From<RoleScope> for Predicate {
  fn from(scope: RoleScope) -> Self {
    match scope {
      RoleScope::Company { company_entity_id } => Predicate::Eq(
        DocumentColumn::CompanyEntityId,
        FilterValue::Uuid(company_entity_id),
      ),
      RoleScope::Regime { regime_entity_id } => Predicate::Eq(
        DocumentColumn::RegimeEntityId,
        FilterValue::Uuid(regime_entity_id),
      ),
    }
  }
}

impl fmt::Display for Predicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fn join(
      f: &mut fmt::Formatter<'_>,
      parts: &[Predicate],
      op: &str,
    ) -> fmt::Result {
      write!(f, "(")?;
      for (i, p) in parts.iter().enumerate() {
        if i > 0 {
          write!(f, " {op} ")?;
        }
        write!(f, "{p}")?;
      }
      write!(f, ")")
    }

    match self {
      Self::Eq(col, v) => write!(f, "{} = {v}", col.as_ref()),
      Self::IsNull(col) => write!(f, "{} IS NULL", col.as_ref()),
      Self::ILike(col, pattern) => write!(f, "{} ILIKE '{pattern}'", col.as_ref()),
      Self::Or(parts) => join(f, parts, "OR"),
      Self::And(parts) => join(f, parts, "AND"),
    }
  }
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// `1` for ascending, `-1` for descending, as sent by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SortDirection {
  Asc,
  Desc,
}

impl TryFrom<i64> for SortDirection {
  type Error = String;

  fn try_from(v: i64) -> std::result::Result<Self, Self::Error> {
    match v {
      1 => Ok(Self::Asc),
      -1 => Ok(Self::Desc),
      other => Err(format!("sort direction must be 1 or -1, got {other}")),
    }
  }
}

impl From<SortDirection> for i64 {
  fn from(d: SortDirection) -> Self {
    match d {
      SortDirection::Asc => 1,
      SortDirection::Desc => -1,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
  Column(DocumentColumn),
  /// A key inside the `metadata` JSON column.
  Metadata(String),
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Column(c) => f.write_str(c.as_ref()),
      Self::Metadata(key) => write!(f, "metadata.{key}"),
    }
  }
}

// ─── Request shapes ──────────────────────────────────────────────────────────

/// The `filter` query parameter exactly as decoded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocumentFilter {
  pub string:    Option<String>,
  pub email:     Option<String>,
  pub entity_id: Option<String>,
  #[serde(flatten)]
  pub fields:    serde_json::Map<String, serde_json::Value>,
}

/// The `sort` query parameter exactly as decoded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocumentSort {
  pub document_expires: Option<SortDirection>,
  #[serde(flatten)]
  pub fields:           BTreeMap<String, SortDirection>,
}

/// A checked document-header filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHeaderFilter {
  /// Partial match on licence number or document name.
  pub string:    Option<String>,
  /// Restrict to documents the individual with this email has a role on.
  pub email:     Option<String>,
  /// Restrict to documents the individual with this id has a role on.
  pub entity_id: Option<Uuid>,
  /// Plain column equalities; `None` matches `NULL`.
  pub fields:    BTreeMap<DocumentColumn, Option<FilterValue>>,
}

impl TryFrom<RawDocumentFilter> for DocumentHeaderFilter {
  type Error = Error;

  fn try_from(raw: RawDocumentFilter) -> Result<Self> {
    let mut v = Validator::default();

    let entity_id = raw
      .entity_id
      .filter(|s| !s.is_empty())
      .map(|s| v.guid("entity_id", &s));

    let mut fields = BTreeMap::new();
    for (key, value) in raw.fields {
      let Ok(column) = key.parse::<DocumentColumn>() else {
        v.reject(&key, "is not a filterable column");
        continue;
      };
      match FilterValue::from_json(value) {
        Ok(value) => {
          fields.insert(column, value);
        }
        Err(message) => v.reject(&key, message),
      }
    }

    v.finish("Filter not valid")?;

    Ok(Self {
      string: raw.string.filter(|s| !s.is_empty()),
      email: raw.email.filter(|s| !s.is_empty()),
      entity_id,
      fields,
    })
  }
}

/// A checked document-header sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHeaderSort {
  /// Sort on the `Expires` key of the metadata.
  pub document_expires: Option<SortDirection>,
  pub fields:           Vec<(DocumentColumn, SortDirection)>,
}

impl TryFrom<RawDocumentSort> for DocumentHeaderSort {
  type Error = Error;

  fn try_from(raw: RawDocumentSort) -> Result<Self> {
    let mut v = Validator::default();
    let mut fields = Vec::with_capacity(raw.fields.len());
    for (key, direction) in raw.fields {
      match key.parse::<DocumentColumn>() {
        Ok(column) => fields.push((column, direction)),
        Err(_) => v.reject(&key, "is not a sortable column"),
      }
    }
    v.finish("Sort not valid")?;
    Ok(Self { document_expires: raw.document_expires, fields })
  }
}

/// One-based page selection.
/// Either key may be omitted and falls back to [`Pagination::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
  pub page:     u32,
  pub per_page: u32,
}

impl Pagination {
  pub fn offset(&self) -> u64 {
    u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
  }
}

impl Default for Pagination {
  fn default() -> Self { Self { page: 1, per_page: 100 } }
}

// ─── Composed query ──────────────────────────────────────────────────────────

/// A fully-resolved document-header query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
  /// Always a top-level [`Predicate::And`].
  pub filter:     Predicate,
  pub sort:       Vec<(SortKey, SortDirection)>,
  pub pagination: Option<Pagination>,
}

/// The free-text predicate: a case-insensitive partial match on either the
/// external system id (licence number) or the document name.
pub fn search_predicate(string: &str) -> Predicate {
  let pattern = format!("%{string}%");
  Predicate::Or(vec![
    Predicate::ILike(DocumentColumn::SystemExternalId, pattern.clone()),
    Predicate::ILike(DocumentColumn::DocumentName, pattern),
  ])
}

/// An `OR` of the scope of every role.
pub fn role_predicate(roles: &[EntityRole]) -> Predicate {
  Predicate::Or(roles.iter().map(|r| Predicate::from(r.scope)).collect())
}

/// Replace the `document_expires` pseudo-column with the metadata path it
/// stands for. The rewritten key goes last.
pub fn rewrite_sort(sort: DocumentHeaderSort) -> Vec<(SortKey, SortDirection)> {
  let mut keys: Vec<_> = sort
    .fields
    .into_iter()
    .map(|(col, dir)| (SortKey::Column(col), dir))
    .collect();
  if let Some(direction) = sort.document_expires {
    keys.push((SortKey::Metadata(EXPIRES_METADATA_KEY.to_owned()), direction));
  }
  keys
}

/// Resolve the search terms in `filter` against `store` and build the query.
///
/// The email lookup (if any) runs before the entity lookup. Either one
/// failing to find any role fails the whole query with [`Error::NotFound`].
pub async fn compose<S>(
  store: &S,
  filter: DocumentHeaderFilter,
  sort: DocumentHeaderSort,
  pagination: Option<Pagination>,
) -> Result<DocumentQuery>
where
  S: EntityRoleRepository,
{
  let DocumentHeaderFilter { string, email, entity_id, fields } = filter;

  let mut clauses: Vec<Predicate> = fields
    .into_iter()
    .map(|(column, value)| match value {
      Some(value) => Predicate::Eq(column, value),
      None => Predicate::IsNull(column),
    })
    .collect();

  if let Some(string) = &string {
    clauses.push(search_predicate(string));
  }

  let mut scoped = Vec::new();

  if let Some(email) = &email {
    let roles = store
      .find_roles_for_email(email)
      .await
      .map_err(Error::store)?;
    if roles.is_empty() {
      return Err(Error::NotFound(format!("Entity {email} not found")));
    }
    scoped.push(role_predicate(&roles));
  }

  if let Some(entity_id) = entity_id {
    let roles = store
      .find_roles_for_entity(entity_id)
      .await
      .map_err(Error::store)?;
    if roles.is_empty() {
      return Err(Error::NotFound(format!("Entity {entity_id} not found")));
    }
    scoped.push(role_predicate(&roles));
  }

  if !scoped.is_empty() {
    clauses.push(Predicate::And(scoped));
  }

  let query = DocumentQuery {
    filter: Predicate::And(clauses),
    sort: rewrite_sort(sort),
    pagination,
  };
  tracing::debug!(filter = %query.filter, "composed document header query");
  Ok(query)
}
