//! Storage backend configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smartplant_schema::DEFAULT_NAMESPACE;

/// Which storage adapter backs the plant store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Ephemeral in-process storage.
    #[default]
    Memory,
    /// JSON blobs in a string key-value store (one file per key on desktop).
    KeyValue,
    /// Rows in a local libSQL database.
    Sql,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::KeyValue => "key_value",
            Self::Sql => "sql",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "memory" => Ok(Self::Memory),
            "key_value" | "kv" => Ok(Self::KeyValue),
            "sql" | "sqlite" => Ok(Self::Sql),
            other => Err(format!(
                "unknown storage backend '{other}' (expected memory, key_value, or sql)"
            )),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_sqlite_path() -> String {
    "smartplant.db".to_string()
}

fn default_kv_dir() -> String {
    ".smartplant/kv".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Prefix of the well-known keys and the `namespace` column in SQL.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Database file for the `sql` backend, or `":memory:"`.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,

    /// Directory holding one file per key for the `key_value` backend.
    #[serde(default = "default_kv_dir")]
    pub kv_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            namespace: default_namespace(),
            sqlite_path: default_sqlite_path(),
            kv_dir: default_kv_dir(),
        }
    }
}
