//! The storage adapter contract and its backends.
//!
//! Every backend stores whole collections under string keys. There is no key
//! enumeration and no transaction at this layer; backends that need more
//! (the SQL adapter's replace-all writes) add it internally.

mod key_value;
mod memory;
mod raw;
mod sql;

pub use key_value::KeyValueAdapter;
pub use memory::MemoryAdapter;
pub use raw::{DirectoryKeyValueStore, MemoryKeyValueStore, RawKeyValueStore};
pub use sql::SqlAdapter;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use smartplant_config::{BackendKind, StorageConfig};

use crate::error::StorageError;

/// Minimal asynchronous key/value contract implemented by every backend.
///
/// `T` is the opaque payload type; the plant store works with JSON values.
/// Adapters perform no caching.
#[async_trait]
pub trait StorageAdapter<T = Value>: Send + Sync
where
    T: Send + Sync,
{
    /// Read the payload stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<T>, StorageError>;

    /// Replace the payload stored under `key`.
    async fn set(&self, key: &str, value: &T) -> Result<(), StorageError>;

    /// Delete whatever is stored under `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Build the adapter selected by `config`.
///
/// # Errors
///
/// Returns `StorageError` if the SQL database cannot be opened or migrated.
pub async fn open_adapter(
    config: &StorageConfig,
) -> Result<Arc<dyn StorageAdapter>, StorageError> {
    let adapter: Arc<dyn StorageAdapter> = match config.backend {
        BackendKind::Memory => Arc::new(MemoryAdapter::<Value>::new()),
        BackendKind::KeyValue => Arc::new(KeyValueAdapter::new(
            DirectoryKeyValueStore::new(PathBuf::from(&config.kv_dir)),
            &config.namespace,
        )),
        BackendKind::Sql => {
            Arc::new(SqlAdapter::open_local(&config.sqlite_path, &config.namespace).await?)
        }
    };
    tracing::debug!(backend = %config.backend, namespace = %config.namespace, "storage adapter opened");
    Ok(adapter)
}
