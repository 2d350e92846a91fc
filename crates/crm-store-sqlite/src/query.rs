//! Compiles a [`DocumentQuery`] into parameterised SQL over
//! `document_header`.

use crm_core::filter::{DocumentQuery, FilterValue, Predicate, SortDirection, SortKey};
use rusqlite::types::Value;

use crate::{
  encode::{RawDocumentHeader, encode_uuid},
  schema::UNICODE_LOWER,
};

/// SQL text plus its positional parameters, in placeholder order.
#[derive(Debug)]
pub struct CompiledQuery {
  pub sql:    String,
  pub params: Vec<Value>,
}

pub fn compile(query: &DocumentQuery) -> CompiledQuery {
  let mut params = Vec::new();
  let mut sql = format!(
    "SELECT {} FROM document_header WHERE {}",
    RawDocumentHeader::COLUMNS.join(", "),
    predicate(&query.filter, &mut params),
  );

  if !query.sort.is_empty() {
    let keys: Vec<String> = query
      .sort
      .iter()
      .map(|(key, direction)| {
        let dir = match direction {
          SortDirection::Asc => "ASC",
          SortDirection::Desc => "DESC",
        };
        format!("{} {dir}", sort_key(key, &mut params))
      })
      .collect();
    sql.push_str(" ORDER BY ");
    sql.push_str(&keys.join(", "));
  }

  if let Some(page) = query.pagination {
    sql.push_str(" LIMIT ? OFFSET ?");
    params.push(Value::Integer(i64::from(page.per_page)));
    params.push(Value::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
  }

  CompiledQuery { sql, params }
}

fn predicate(p: &Predicate, params: &mut Vec<Value>) -> String {
  match p {
    Predicate::Eq(column, value) => {
      params.push(bind(value));
      format!("{} = ?", column.as_ref())
    }
    Predicate::IsNull(column) => format!("{} IS NULL", column.as_ref()),
    Predicate::ILike(column, pattern) => {
      params.push(Value::Text(pattern.clone()));
      format!("{UNICODE_LOWER}({}) LIKE {UNICODE_LOWER}(?)", column.as_ref())
    }
    Predicate::And(parts) => group(parts, " AND ", "1=1", params),
    Predicate::Or(parts) => group(parts, " OR ", "0=1", params),
  }
}

fn group(parts: &[Predicate], op: &str, empty: &str, params: &mut Vec<Value>) -> String {
  if parts.is_empty() {
    return empty.to_owned();
  }
  let parts: Vec<String> = parts.iter().map(|p| predicate(p, params)).collect();
  format!("({})", parts.join(op))
}

fn sort_key(key: &SortKey, params: &mut Vec<Value>) -> String {
  match key {
    SortKey::Column(column) => column.as_ref().to_owned(),
    SortKey::Metadata(name) => {
      params.push(Value::Text(format!("$.\"{name}\"")));
      "json_extract(metadata, ?)".to_owned()
    }
  }
}

fn bind(value: &FilterValue) -> Value {
  match value {
    FilterValue::Text(s) => Value::Text(s.clone()),
    FilterValue::Integer(i) => Value::Integer(*i),
    FilterValue::Bool(b) => Value::Integer(i64::from(*b)),
    FilterValue::Uuid(u) => Value::Text(encode_uuid(*u)),
  }
}

#[cfg(test)]
mod tests {
  use crm_core::filter::{DocumentColumn, Pagination, search_predicate};
  use uuid::Uuid;

  use super::*;

  fn where_clause(q: &CompiledQuery) -> &str {
    let start = q.sql.find(" WHERE ").unwrap() + " WHERE ".len();
    &q.sql[start..]
  }

  #[test]
  fn empty_filter_matches_everything() {
    let q = compile(&DocumentQuery {
      filter:     Predicate::And(vec![]),
      sort:       vec![],
      pagination: None,
    });
    assert_eq!(where_clause(&q), "1=1");
    assert!(q.params.is_empty());
  }

  #[test]
  fn nested_predicates_bind_in_order() {
    let regime = Uuid::new_v4();
    let q = compile(&DocumentQuery {
      filter:     Predicate::And(vec![
        Predicate::IsNull(DocumentColumn::CompanyEntityId),
        Predicate::Eq(DocumentColumn::Verified, FilterValue::Integer(1)),
        search_predicate("01/115"),
        Predicate::And(vec![Predicate::Or(vec![Predicate::Eq(
          DocumentColumn::RegimeEntityId,
          FilterValue::Uuid(regime),
        )])]),
      ]),
      sort:       vec![],
      pagination: None,
    });
    assert_eq!(
      where_clause(&q),
      "(company_entity_id IS NULL AND verified = ? AND (unicode_lower(system_external_id) \
       LIKE unicode_lower(?) OR unicode_lower(document_name) LIKE unicode_lower(?)) AND \
       ((regime_entity_id = ?)))"
    );
    assert_eq!(q.params, vec![
      Value::Integer(1),
      Value::Text("%01/115%".into()),
      Value::Text("%01/115%".into()),
      Value::Text(regime.to_string()),
    ]);
  }

  #[test]
  fn empty_or_matches_nothing() {
    let q = compile(&DocumentQuery {
      filter:     Predicate::And(vec![Predicate::Or(vec![])]),
      sort:       vec![],
      pagination: None,
    });
    assert_eq!(where_clause(&q), "(0=1)");
  }

  #[test]
  fn sort_then_page() {
    let q = compile(&DocumentQuery {
      filter:     Predicate::And(vec![]),
      sort:       vec![
        (SortKey::Column(DocumentColumn::SystemExternalId), SortDirection::Asc),
        (SortKey::Metadata("Expires".into()), SortDirection::Desc),
      ],
      pagination: Some(Pagination { page: 3, per_page: 20 }),
    });
    assert!(q.sql.ends_with(
      "ORDER BY system_external_id ASC, json_extract(metadata, ?) DESC LIMIT ? OFFSET ?"
    ));
    assert_eq!(q.params, vec![
      Value::Text("$.\"Expires\"".into()),
      Value::Integer(20),
      Value::Integer(40),
    ]);
  }
}
