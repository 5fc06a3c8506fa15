//! Raw string key-value backends wrapped by [`KeyValueAdapter`](super::KeyValueAdapter).
//!
//! These model a platform key-value API: strings in, strings out, no
//! knowledge of what the strings contain.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;

/// An asynchronous string-to-string store.
#[async_trait]
pub trait RawKeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local raw store.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RawKeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Raw store keeping one file per key under a directory.
///
/// Keys are percent-encoded into file names so `:` and `/` are safe on every
/// platform. Writes go to a temporary sibling first and are renamed into
/// place, so a reader never sees a half-written value.
pub struct DirectoryKeyValueStore {
    dir: PathBuf,
}

impl DirectoryKeyValueStore {
    /// Point the store at `dir`. The directory is created on first write.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory where values are stored.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl RawKeyValueStore for DirectoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_escape_separators() {
        let store = DirectoryKeyValueStore::new(PathBuf::from("kv"));
        assert_eq!(
            store.path_for("smartplant:plants"),
            Path::new("kv").join("smartplant%3Aplants.json")
        );
        assert_eq!(
            store.path_for("a/b c"),
            Path::new("kv").join("a%2Fb%20c.json")
        );
        assert_eq!(
            store.path_for("plain-key_1.x~y"),
            Path::new("kv").join("plain-key_1.x~y.json")
        );
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        store.set_item("k", "v".into()).await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v"));
        store.remove_item("k").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn directory_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryKeyValueStore::new(dir.path().join("kv"));
        assert_eq!(store.get_item("smartplant:plants").await.unwrap(), None);

        store
            .set_item("smartplant:plants", "[1,2]".into())
            .await
            .unwrap();

        let reopened = DirectoryKeyValueStore::new(dir.path().join("kv"));
        assert_eq!(
            reopened.get_item("smartplant:plants").await.unwrap().as_deref(),
            Some("[1,2]")
        );
        assert!(reopened.dir().join("smartplant%3Aplants.json").exists());

        reopened.remove_item("smartplant:plants").await.unwrap();
        reopened.remove_item("smartplant:plants").await.unwrap();
        assert_eq!(store.get_item("smartplant:plants").await.unwrap(), None);
    }
}
