use std::path::PathBuf;

use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml` and
/// `CRM_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Path segment the v1 routes are mounted under, as in `/crm/{version}`.
  #[serde(default = "default_version")]
  pub version:    String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8002 }

fn default_store_path() -> PathBuf { PathBuf::from("crm.sqlite3") }

fn default_version() -> String { "1.0".to_owned() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_source_uses_defaults() {
    let cfg: ServerConfig = ::config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8002);
    assert_eq!(cfg.store_path, PathBuf::from("crm.sqlite3"));
    assert_eq!(cfg.version, "1.0");
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg: ServerConfig = ::config::Config::builder()
      .add_source(::config::File::from_str(
        "port = 9000\nstore_path = \"/var/lib/crm/crm.sqlite3\"",
        ::config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/crm/crm.sqlite3"));
    assert_eq!(cfg.host, "127.0.0.1");
  }
}
