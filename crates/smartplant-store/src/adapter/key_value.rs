//! JSON adapter over a raw string key-value store.

use async_trait::async_trait;
use serde_json::Value;
use smartplant_schema::{
    StorageKeys, validate_persisted_plants_payload, validate_persisted_species_payload,
};

use super::StorageAdapter;
use super::raw::RawKeyValueStore;
use crate::error::StorageError;

/// Serializes payloads to JSON text and stores them in a [`RawKeyValueStore`].
///
/// Writes to the two well-known keys of the configured namespace are
/// validated against the persisted schema before anything is serialized;
/// other keys are stored as opaque JSON.
pub struct KeyValueAdapter<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: RawKeyValueStore> KeyValueAdapter<S> {
    #[must_use]
    pub fn new(store: S, namespace: &str) -> Self {
        Self {
            store,
            keys: StorageKeys::for_namespace(namespace),
        }
    }

    /// Access the wrapped raw store.
    #[must_use]
    pub const fn raw(&self) -> &S {
        &self.store
    }

    fn validate(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if key == self.keys.plants {
            validate_persisted_plants_payload(key, value)?;
        } else if key == self.keys.species_cache {
            validate_persisted_species_payload(key, value)?;
        } else if StorageKeys::is_family_key(key) {
            tracing::warn!(
                key = %key,
                "family key outside this adapter's namespace is written without validation"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl<S: RawKeyValueStore> StorageAdapter for KeyValueAdapter<S> {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match self.store.get_item(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.validate(key, value)?;
        let text = serde_json::to_string(value)?;
        self.store.set_item(key, text).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove_item(key).await
    }
}
