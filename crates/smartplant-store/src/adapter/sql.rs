//! Relational adapter backed by libSQL.
//!
//! The two record families are stored as rows rather than one JSON blob per
//! key:
//!
//! - `plants(namespace, plant_id, payload)`
//! - `species_cache(namespace, species_key, payload, ttl_days, refreshed_at, source)`
//! - `kv_store(namespace, key, payload)` for arbitrary keys and for the schema
//!   metadata row of each family (`<storage key>__meta`)
//!
//! A `set` on a family key replaces every row of the namespace inside one
//! immediate transaction, then upserts the metadata row, so the rows
//! and their recorded schema version always agree.

use std::future::Future;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, TransactionBehavior};
use serde_json::{Map, Value};
use smartplant_schema::{
    SchemaMetadata, StorageKeys, create_schema_metadata_key, schema_version_of,
    validate_persisted_plants_payload, validate_persisted_species_payload,
};

use super::StorageAdapter;
use crate::error::StorageError;
use crate::helpers::canonical_timestamp;

/// Which table a key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Plants,
    SpeciesCache,
    Generic,
}

/// Stores plants and species cache entries as rows in libSQL.
pub struct SqlAdapter {
    #[allow(dead_code)]
    db: Option<libsql::Database>,
    conn: libsql::Connection,
    namespace: String,
    keys: StorageKeys,
}

impl SqlAdapter {
    /// Open a local database at `path` (or `":memory:"`) scoped to `namespace`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the database cannot be opened or migrations fail.
    pub async fn open_local(path: &str, namespace: &str) -> Result<Self, StorageError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let adapter = Self {
            db: Some(db),
            conn,
            namespace: namespace.to_string(),
            keys: StorageKeys::for_namespace(namespace),
        };
        adapter.run_migrations().await?;
        Ok(adapter)
    }

    /// Wrap an existing connection, e.g. one shared with other namespaces.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Migration` if the schema cannot be created.
    pub async fn from_connection(
        conn: libsql::Connection,
        namespace: &str,
    ) -> Result<Self, StorageError> {
        let adapter = Self {
            db: None,
            conn,
            namespace: namespace.to_string(),
            keys: StorageKeys::for_namespace(namespace),
        };
        adapter.run_migrations().await?;
        Ok(adapter)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn target(&self, key: &str) -> Target {
        if key == self.keys.plants {
            Target::Plants
        } else if key == self.keys.species_cache {
            Target::SpeciesCache
        } else {
            if StorageKeys::is_family_key(key) {
                tracing::warn!(
                    key = %key,
                    namespace = %self.namespace,
                    "family key outside this adapter's namespace is stored as an opaque value"
                );
            }
            Target::Generic
        }
    }

    /// Run `work` inside an immediate transaction and commit it.
    ///
    /// On failure the transaction is rolled back; a failing rollback is
    /// logged and swallowed, and the original error is returned.
    async fn in_transaction<F>(&self, work: F) -> Result<(), StorageError>
    where
        F: Future<Output = Result<(), StorageError>> + Send,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        match work.await {
            Ok(()) => Ok(tx.commit().await?),
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::debug!(%rollback_error, "rollback after failed write did not succeed");
                }
                Err(error)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Metadata rows
    // -----------------------------------------------------------------------

    async fn read_metadata_version(&self, storage_key: &str) -> Result<Option<u32>, StorageError> {
        let meta_key = create_schema_metadata_key(storage_key);
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM kv_store WHERE namespace = ?1 AND key = ?2",
                libsql::params![self.namespace.as_str(), meta_key.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => {
                let payload: Value = serde_json::from_str(&row.get::<String>(0)?)?;
                Ok(schema_version_of(&payload))
            }
            None => Ok(None),
        }
    }

    async fn write_metadata(&self, storage_key: &str, version: u32) -> Result<(), StorageError> {
        let meta_key = create_schema_metadata_key(storage_key);
        let payload = serde_json::to_string(&SchemaMetadata {
            schema_version: version,
            updated_at: Utc::now(),
        })?;
        self.upsert_kv(&meta_key, &payload).await
    }

    // -----------------------------------------------------------------------
    // kv_store
    // -----------------------------------------------------------------------

    async fn upsert_kv(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (namespace, key, payload) VALUES (?1, ?2, ?3)
                 ON CONFLICT(namespace, key) DO UPDATE SET payload = excluded.payload",
                libsql::params![self.namespace.as_str(), key, payload],
            )
            .await?;
        Ok(())
    }

    async fn delete_kv(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "DELETE FROM kv_store WHERE namespace = ?1 AND key = ?2",
                libsql::params![self.namespace.as_str(), key],
            )
            .await?;
        Ok(())
    }

    async fn get_kv(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM kv_store WHERE namespace = ?1 AND key = ?2",
                libsql::params![self.namespace.as_str(), key],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(serde_json::from_str(&row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // plants
    // -----------------------------------------------------------------------

    async fn replace_plants(
        &self,
        storage_key: &str,
        version: u32,
        plants: &[Value],
    ) -> Result<(), StorageError> {
        self.conn
            .execute(
                "DELETE FROM plants WHERE namespace = ?1",
                [self.namespace.as_str()],
            )
            .await?;
        for plant in plants {
            let plant_id = plant.get("id").and_then(Value::as_str).unwrap_or_default();
            let payload = serde_json::to_string(&row_payload(version, "plant", plant))?;
            self.conn
                .execute(
                    "INSERT INTO plants (namespace, plant_id, payload) VALUES (?1, ?2, ?3)",
                    libsql::params![self.namespace.as_str(), plant_id, payload],
                )
                .await?;
        }
        self.write_metadata(storage_key, version).await
    }

    async fn read_plants(&self, storage_key: &str) -> Result<Option<Value>, StorageError> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM plants WHERE namespace = ?1 ORDER BY rowid",
                [self.namespace.as_str()],
            )
            .await?;
        let mut plants = Vec::new();
        let mut row_version = None;
        while let Some(row) = rows.next().await? {
            let payload: Value = serde_json::from_str(&row.get::<String>(0)?)?;
            let (version, record) = split_row_payload(payload, "plant");
            row_version = row_version.max(version);
            plants.push(record);
        }

        let recorded = self.read_metadata_version(storage_key).await?;
        Ok(assemble(recorded.or(row_version), "plants", Value::Array(plants), recorded.is_some()))
    }

    // -----------------------------------------------------------------------
    // species_cache
    // -----------------------------------------------------------------------

    async fn replace_species(
        &self,
        storage_key: &str,
        version: u32,
        entries: &Map<String, Value>,
    ) -> Result<(), StorageError> {
        self.conn
            .execute(
                "DELETE FROM species_cache WHERE namespace = ?1",
                [self.namespace.as_str()],
            )
            .await?;
        for (species_key, entry) in entries {
            let profile = entry.get("profile").cloned().unwrap_or(Value::Null);
            let ttl_days = entry
                .get("ttlDays")
                .and_then(Value::as_u64)
                .and_then(|v| i64::try_from(v).ok())
                .unwrap_or_default();
            let refreshed_at = entry
                .get("refreshedAt")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let source = entry.get("source").and_then(Value::as_str).unwrap_or_default();
            let payload = serde_json::to_string(&row_payload(version, "profile", &profile))?;
            self.conn
                .execute(
                    "INSERT INTO species_cache
                       (namespace, species_key, payload, ttl_days, refreshed_at, source)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    libsql::params![
                        self.namespace.as_str(),
                        species_key.as_str(),
                        payload,
                        ttl_days,
                        refreshed_at,
                        source
                    ],
                )
                .await?;
        }
        self.write_metadata(storage_key, version).await
    }

    async fn read_species(&self, storage_key: &str) -> Result<Option<Value>, StorageError> {
        let mut rows = self
            .conn
            .query(
                "SELECT species_key, payload, ttl_days, refreshed_at, source
                 FROM species_cache WHERE namespace = ?1 ORDER BY species_key",
                [self.namespace.as_str()],
            )
            .await?;
        let mut entries = Map::new();
        let mut row_version = None;
        while let Some(row) = rows.next().await? {
            let species_key = row.get::<String>(0)?;
            let payload: Value = serde_json::from_str(&row.get::<String>(1)?)?;
            let (version, profile) = split_row_payload(payload, "profile");
            row_version = row_version.max(version);

            let mut entry = Map::new();
            entry.insert("profile".into(), profile);
            entry.insert("ttlDays".into(), Value::from(row.get::<i64>(2)?));
            entry.insert(
                "refreshedAt".into(),
                Value::from(canonical_timestamp(&row.get::<String>(3)?)),
            );
            entry.insert("source".into(), Value::from(row.get::<String>(4)?));
            entries.insert(species_key, Value::Object(entry));
        }

        let recorded = self.read_metadata_version(storage_key).await?;
        Ok(assemble(
            recorded.or(row_version),
            "entries",
            Value::Object(entries),
            recorded.is_some(),
        ))
    }

    async fn clear_family(&self, table: &str, storage_key: &str) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {table} WHERE namespace = ?1");
        self.in_transaction(async {
            self.conn.execute(&sql, [self.namespace.as_str()]).await?;
            self.delete_kv(&create_schema_metadata_key(storage_key)).await
        })
        .await
    }
}

/// Row payload: the record with the writing schema version alongside it.
fn row_payload(version: u32, field: &str, record: &Value) -> Value {
    let mut payload = Map::new();
    payload.insert("schemaVersion".into(), Value::from(version));
    payload.insert(field.into(), record.clone());
    Value::Object(payload)
}

/// Split a row payload into its embedded version and the record.
///
/// Rows that predate the wrapper are the bare record with no version.
fn split_row_payload(payload: Value, field: &str) -> (Option<u32>, Value) {
    match payload {
        Value::Object(mut map) if map.contains_key(field) => {
            let version = map
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok());
            (version, map.remove(field).unwrap_or(Value::Null))
        }
        other => (None, other),
    }
}

/// Rebuild an envelope from rows.
///
/// No rows and no metadata means the key was never written. Rows without any
/// version information come back as the bare collection, the pre-versioning
/// shape, so the store migrates them.
fn assemble(
    version: Option<u32>,
    field: &str,
    collection: Value,
    has_metadata: bool,
) -> Option<Value> {
    let is_empty = match &collection {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => true,
    };
    if is_empty && !has_metadata {
        return None;
    }
    match version {
        Some(version) => {
            let mut envelope = Map::new();
            envelope.insert("schemaVersion".into(), Value::from(version));
            envelope.insert(field.into(), collection);
            Some(Value::Object(envelope))
        }
        None => Some(collection),
    }
}

#[async_trait]
impl StorageAdapter for SqlAdapter {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match self.target(key) {
            Target::Plants => self.read_plants(key).await,
            Target::SpeciesCache => self.read_species(key).await,
            Target::Generic => self.get_kv(key).await,
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        match self.target(key) {
            Target::Plants => {
                validate_persisted_plants_payload(key, value)?;
                let version = schema_version_of(value).unwrap_or_default();
                let plants = value
                    .get("plants")
                    .and_then(Value::as_array)
                    .map_or(&[][..], Vec::as_slice);
                self.in_transaction(self.replace_plants(key, version, plants))
                    .await
            }
            Target::SpeciesCache => {
                validate_persisted_species_payload(key, value)?;
                let version = schema_version_of(value).unwrap_or_default();
                let empty = Map::new();
                let entries = value
                    .get("entries")
                    .and_then(Value::as_object)
                    .unwrap_or(&empty);
                self.in_transaction(self.replace_species(key, version, entries))
                    .await
            }
            Target::Generic => {
                let payload = serde_json::to_string(value)?;
                self.upsert_kv(key, &payload).await
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.target(key) {
            Target::Plants => self.clear_family("plants", key).await,
            Target::SpeciesCache => self.clear_family("species_cache", key).await,
            Target::Generic => self.delete_kv(key).await,
        }
    }
}
