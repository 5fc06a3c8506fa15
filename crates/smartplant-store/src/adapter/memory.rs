//! In-memory adapter for tests and ephemeral stores.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::StorageAdapter;
use crate::error::StorageError;

/// Stores payloads in a process-local map.
///
/// Values are cloned on the way in and on the way out, so neither the caller
/// nor a reader can alias what the adapter holds.
pub struct MemoryAdapter<T = Value> {
    entries: RwLock<HashMap<String, T>>,
    fail_writes: AtomicBool,
}

impl<T> MemoryAdapter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seed the adapter with existing payloads.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, T)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `set` and `remove` fail, simulating an
    /// unavailable backend.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Whether anything is stored under `key`.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("memory adapter is rejecting writes".into()));
        }
        Ok(())
    }
}

impl<T> Default for MemoryAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> StorageAdapter<T> for MemoryAdapter<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<T>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}
