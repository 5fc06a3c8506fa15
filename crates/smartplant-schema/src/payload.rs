//! Persisted envelope types.
//!
//! Each well-known key holds one envelope: a `schemaVersion` tag around the
//! whole collection. Readers must never partially trust an envelope whose
//! version is newer than the constants below.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smartplant_core::entities::{CachedSpeciesEntry, Plant};

/// Current schema version of the plants envelope.
pub const PLANTS_SCHEMA_VERSION: u32 = 1;

/// Current schema version of the species cache envelope.
pub const SPECIES_CACHE_SCHEMA_VERSION: u32 = 1;

/// TTL assigned to cache entries that carry no TTL of their own.
pub const DEFAULT_SPECIES_TTL_DAYS: u32 = 180;

/// `{ schemaVersion, plants: [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPlantsPayload {
    pub schema_version: u32,
    pub plants: Vec<Plant>,
}

impl PersistedPlantsPayload {
    /// Wrap `plants` in an envelope tagged with the current version.
    #[must_use]
    pub const fn current(plants: Vec<Plant>) -> Self {
        Self {
            schema_version: PLANTS_SCHEMA_VERSION,
            plants,
        }
    }
}

/// `{ schemaVersion, entries: { [speciesKey]: CachedSpeciesEntry } }`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSpeciesCachePayload {
    pub schema_version: u32,
    pub entries: BTreeMap<String, CachedSpeciesEntry>,
}

impl PersistedSpeciesCachePayload {
    /// Wrap `entries` in an envelope tagged with the current version.
    #[must_use]
    pub const fn current(entries: BTreeMap<String, CachedSpeciesEntry>) -> Self {
        Self {
            schema_version: SPECIES_CACHE_SCHEMA_VERSION,
            entries,
        }
    }
}

/// Version record kept under [`create_schema_metadata_key`](crate::create_schema_metadata_key)
/// by backends that store collections as rows.
///
/// Lets an empty-but-versioned collection be told apart from one that was
/// never written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    pub schema_version: u32,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plants_envelope_uses_camel_case() {
        let json = serde_json::to_value(PersistedPlantsPayload::current(vec![])).unwrap();
        assert_eq!(json, serde_json::json!({"schemaVersion": 1, "plants": []}));
    }

    #[test]
    fn species_envelope_serializes_entries_as_map() {
        let json =
            serde_json::to_value(PersistedSpeciesCachePayload::current(BTreeMap::new())).unwrap();
        assert_eq!(json, serde_json::json!({"schemaVersion": 1, "entries": {}}));
    }
}
