//! SQL schema for the CRM SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

use rusqlite::{Connection, functions::FunctionFlags};

/// Case folding for every case-insensitive comparison. SQLite's own
/// `LOWER` only folds ASCII.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Register the application-defined SQL functions on `conn`.
///
/// Must run before [`SCHEMA`] and before any query that calls them.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    UNICODE_LOWER,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
  )
}

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// UUIDs, dates and timestamps are TEXT; booleans are INTEGER 0/1; JSON
/// columns are TEXT holding a serialised object.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ─── v1 ─────────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS entity (
    entity_id   TEXT PRIMARY KEY,
    entity_nm   TEXT NOT NULL,     -- email address for individuals
    entity_type TEXT NOT NULL CHECK (entity_type IN ('individual', 'company', 'regime')),
    created_at  TEXT NOT NULL
);

-- Exactly one of regime_entity_id / company_entity_id is set.
CREATE TABLE IF NOT EXISTS entity_roles (
    entity_role_id    TEXT PRIMARY KEY,
    entity_id         TEXT NOT NULL REFERENCES entity(entity_id) ON DELETE CASCADE,
    role              TEXT NOT NULL,
    regime_entity_id  TEXT,
    company_entity_id TEXT,
    permissions       TEXT NOT NULL DEFAULT '{}',
    created_at        TEXT NOT NULL,
    created_by        TEXT,
    CHECK ((regime_entity_id IS NULL) <> (company_entity_id IS NULL))
);

CREATE INDEX IF NOT EXISTS entity_roles_entity_idx ON entity_roles (entity_id);

CREATE TABLE IF NOT EXISTS document_header (
    document_id        TEXT PRIMARY KEY,
    regime_entity_id   TEXT NOT NULL,
    system_id          TEXT NOT NULL,
    system_internal_id TEXT NOT NULL,
    system_external_id TEXT NOT NULL,
    document_name      TEXT,
    metadata           TEXT NOT NULL DEFAULT '{}',
    company_entity_id  TEXT,
    verified           INTEGER,
    verification_id    TEXT,
    UNIQUE (system_id, system_internal_id, regime_entity_id)
);

-- ─── v2 ─────────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS companies (
    company_id        TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    type              TEXT NOT NULL CHECK (type IN ('person', 'organisation')),
    company_number    TEXT,
    organisation_type TEXT,
    is_test           INTEGER NOT NULL DEFAULT 0,
    date_created      TEXT NOT NULL,
    date_updated      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    contact_id   TEXT PRIMARY KEY,
    salutation   TEXT,
    first_name   TEXT,
    initials     TEXT,
    middle_name  TEXT,
    last_name    TEXT NOT NULL,
    is_test      INTEGER NOT NULL DEFAULT 0,
    date_created TEXT NOT NULL,
    date_updated TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS addresses (
    address_id   TEXT PRIMARY KEY,
    address_1    TEXT,
    address_2    TEXT,
    address_3    TEXT,
    address_4    TEXT,
    town         TEXT,
    county       TEXT,
    postcode     TEXT,
    country      TEXT,
    uprn         INTEGER CHECK (uprn IS NULL OR uprn >= 0),
    data_source  TEXT NOT NULL DEFAULT 'wrls',
    is_test      INTEGER NOT NULL DEFAULT 0,
    date_created TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS roles (
    role_id TEXT PRIMARY KEY,
    name    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS company_addresses (
    company_address_id TEXT PRIMARY KEY,
    company_id         TEXT NOT NULL REFERENCES companies(company_id),
    address_id         TEXT NOT NULL REFERENCES addresses(address_id),
    role_id            TEXT NOT NULL REFERENCES roles(role_id),
    start_date         TEXT NOT NULL,
    end_date           TEXT,
    is_default         INTEGER NOT NULL DEFAULT 0,
    is_test            INTEGER NOT NULL DEFAULT 0,
    date_created       TEXT NOT NULL,
    UNIQUE (company_id, address_id, role_id, start_date),
    CHECK  (end_date IS NULL OR end_date >= start_date)
);

CREATE TABLE IF NOT EXISTS company_contacts (
    company_contact_id TEXT PRIMARY KEY,
    company_id         TEXT NOT NULL REFERENCES companies(company_id),
    contact_id         TEXT NOT NULL REFERENCES contacts(contact_id),
    role_id            TEXT NOT NULL REFERENCES roles(role_id),
    start_date         TEXT NOT NULL,
    end_date           TEXT,
    is_default         INTEGER NOT NULL DEFAULT 0,
    is_test            INTEGER NOT NULL DEFAULT 0,
    date_created       TEXT NOT NULL,
    UNIQUE (company_id, contact_id, role_id, start_date),
    CHECK  (end_date IS NULL OR end_date >= start_date)
);

CREATE TABLE IF NOT EXISTS invoice_accounts (
    invoice_account_id     TEXT PRIMARY KEY,
    company_id             TEXT NOT NULL REFERENCES companies(company_id),
    invoice_account_number TEXT NOT NULL UNIQUE,
    start_date             TEXT NOT NULL,
    end_date               TEXT,
    is_test                INTEGER NOT NULL DEFAULT 0,
    date_created           TEXT NOT NULL
);

-- Addresses go with their account.
CREATE TABLE IF NOT EXISTS invoice_account_addresses (
    invoice_account_address_id TEXT PRIMARY KEY,
    invoice_account_id         TEXT NOT NULL REFERENCES invoice_accounts(invoice_account_id) ON DELETE CASCADE,
    address_id                 TEXT NOT NULL REFERENCES addresses(address_id),
    start_date                 TEXT NOT NULL,
    end_date                   TEXT,
    is_test                    INTEGER NOT NULL DEFAULT 0,
    date_created               TEXT NOT NULL,
    UNIQUE (invoice_account_id, start_date),
    CHECK  (end_date IS NULL OR end_date >= start_date)
);

CREATE TABLE IF NOT EXISTS documents (
    document_id   TEXT PRIMARY KEY,
    regime        TEXT NOT NULL,
    document_type TEXT NOT NULL,
    document_ref  TEXT NOT NULL,
    status        TEXT NOT NULL,
    version       INTEGER NOT NULL CHECK (version >= 0),
    start_date    TEXT NOT NULL,
    end_date      TEXT,
    is_test       INTEGER NOT NULL DEFAULT 0,
    date_created  TEXT NOT NULL,
    UNIQUE (regime, document_type, document_ref, version)
);

PRAGMA user_version = 1;
";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unicode_lower_folds_beyond_ascii() {
    let conn = Connection::open_in_memory().unwrap();
    register_functions(&conn).unwrap();
    let folded: String = conn
      .query_row("SELECT unicode_lower('ÉMILE Ölfeld')", [], |row| row.get(0))
      .unwrap();
    assert_eq!(folded, "émile ölfeld");
    let null: Option<String> = conn
      .query_row("SELECT unicode_lower(NULL)", [], |row| row.get(0))
      .unwrap();
    assert_eq!(null, None);
  }
}
