//! Storage key derivation.

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "smartplant";

/// Suffix appended to a storage key to form its schema metadata key.
const METADATA_KEY_SUFFIX: &str = "__meta";

/// Derive the key under which a backend records schema metadata for
/// `storage_key`. Deterministic: `"<storage_key>__meta"`.
#[must_use]
pub fn create_schema_metadata_key(storage_key: &str) -> String {
    format!("{storage_key}{METADATA_KEY_SUFFIX}")
}

const PLANTS_SUFFIX: &str = ":plants";
const SPECIES_CACHE_SUFFIX: &str = ":species-cache";

/// The two well-known keys of one logical store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// `"<namespace>:plants"`
    pub plants: String,
    /// `"<namespace>:species-cache"`
    pub species_cache: String,
}

impl StorageKeys {
    #[must_use]
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            plants: format!("{namespace}{PLANTS_SUFFIX}"),
            species_cache: format!("{namespace}{SPECIES_CACHE_SUFFIX}"),
        }
    }

    /// Whether `key` has the shape of a plants or species-cache key in any
    /// namespace.
    #[must_use]
    pub fn is_family_key(key: &str) -> bool {
        key.ends_with(PLANTS_SUFFIX) || key.ends_with(SPECIES_CACHE_SUFFIX)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_NAMESPACE)
    }
}
