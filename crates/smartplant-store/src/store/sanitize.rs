//! Hydrate-time classification and cleanup of persisted payloads.
//!
//! Each raw value is classified once into absent, current, legacy, future or
//! unrecognized. Everything downstream works on the normalized domain types
//! produced here.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use smartplant_core::entities::{CachedSpeciesEntry, Plant, SpeciesProfile};
use smartplant_core::normalize::{is_cached_species_entry, is_plant, normalize_key};
use smartplant_schema::{
    PLANTS_SCHEMA_VERSION, SPECIES_CACHE_SCHEMA_VERSION, is_persisted_species_cache_entry,
};

/// What hydration found for one record family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyReport {
    /// Records kept after normalization.
    pub loaded: usize,
    /// Records dropped because they failed the domain predicate, were
    /// duplicates, or could not be read at all.
    pub invalid: usize,
    /// The payload was in a pre-versioning or older shape.
    pub migrated: bool,
    /// Set when the payload carried a newer schema version than this build
    /// understands; the records were discarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_version: Option<u64>,
}

impl FamilyReport {
    /// Whether the sanitized collection differs from what is stored and
    /// should be written back.
    #[must_use]
    pub const fn needs_write_back(&self) -> bool {
        self.future_version.is_none() && (self.migrated || self.invalid > 0)
    }
}

pub(crate) struct Sanitized<T> {
    pub(crate) records: T,
    pub(crate) report: FamilyReport,
    /// Keys of entries whose `refreshedAt` could not be parsed.
    pub(crate) expired: Vec<String>,
}

impl<T: Default> Sanitized<T> {
    fn empty(report: FamilyReport) -> Self {
        Self {
            records: T::default(),
            report,
            expired: Vec::new(),
        }
    }

    /// A payload whose stored text was not valid JSON: nothing loads and the
    /// whole value counts as one invalid record.
    pub(crate) fn corrupt() -> Self {
        Self::empty(FamilyReport {
            invalid: 1,
            ..FamilyReport::default()
        })
    }
}

#[derive(Debug, PartialEq)]
enum Shape<'a> {
    Absent,
    Versioned { version: u64, records: &'a Value },
    Legacy(&'a Value),
    Future(u64),
    Unrecognized,
}

/// Classify a raw payload.
///
/// `field` is the envelope's collection field and `is_collection` recognizes
/// the bare collection that predates envelopes.
fn classify<'a>(
    raw: Option<&'a Value>,
    current: u32,
    field: &str,
    is_collection: fn(&Value) -> bool,
) -> Shape<'a> {
    let value = match raw {
        None | Some(Value::Null) => return Shape::Absent,
        Some(value) => value,
    };
    let Value::Object(map) = value else {
        return if is_collection(value) {
            Shape::Legacy(value)
        } else {
            Shape::Unrecognized
        };
    };
    let collection = map.get(field).filter(|c| is_collection(c));
    match map.get("schemaVersion").map(Value::as_u64) {
        Some(Some(version)) if version > u64::from(current) => Shape::Future(version),
        Some(Some(version)) => {
            collection.map_or(Shape::Unrecognized, |records| Shape::Versioned { version, records })
        }
        Some(None) => Shape::Unrecognized,
        None => match collection {
            Some(records) => Shape::Legacy(records),
            None if is_collection(value) => Shape::Legacy(value),
            None => Shape::Unrecognized,
        },
    }
}

/// Bring a pre-versioning plant record up to the current shape.
///
/// Older records embedded the whole species profile; only its key is kept.
/// Missing timestamps are filled with `now`.
fn upgrade_legacy_plant(record: &Value, now: DateTime<Utc>) -> Value {
    let Value::Object(map) = record else {
        return record.clone();
    };
    let mut map: Map<String, Value> = map.clone();
    let embedded = map.remove("speciesProfile");
    if !map.get("speciesKey").is_some_and(Value::is_string) {
        if let Some(key) = embedded.as_ref().and_then(|p| p.get("speciesKey")) {
            map.insert("speciesKey".into(), key.clone());
        }
    }
    let created = map
        .entry("createdAt")
        .or_insert_with(|| Value::from(now.to_rfc3339()))
        .clone();
    map.entry("updatedAt").or_insert(created);
    Value::Object(map)
}

pub(crate) fn sanitize_plants(raw: Option<&Value>, now: DateTime<Utc>) -> Sanitized<Vec<Plant>> {
    let (records, migrated) = match classify(raw, PLANTS_SCHEMA_VERSION, "plants", Value::is_array)
    {
        Shape::Absent => return Sanitized::empty(FamilyReport::default()),
        Shape::Future(version) => {
            return Sanitized::empty(FamilyReport {
                future_version: Some(version),
                ..FamilyReport::default()
            });
        }
        Shape::Unrecognized => {
            return Sanitized::empty(FamilyReport {
                invalid: 1,
                ..FamilyReport::default()
            });
        }
        Shape::Versioned { version, records } => {
            (records, version < u64::from(PLANTS_SCHEMA_VERSION))
        }
        Shape::Legacy(records) => (records, true),
    };

    let mut plants = Vec::new();
    let mut seen = HashSet::new();
    let mut invalid = 0;
    for (idx, record) in records.as_array().into_iter().flatten().enumerate() {
        let candidate = if migrated {
            upgrade_legacy_plant(record, now)
        } else {
            record.clone()
        };
        match serde_json::from_value::<Plant>(candidate).map(Plant::normalized) {
            Ok(plant) if is_plant(&plant) && seen.insert(plant.id.clone()) => plants.push(plant),
            _ => {
                tracing::debug!(index = idx, "dropping invalid plant record");
                invalid += 1;
            }
        }
    }

    Sanitized {
        report: FamilyReport {
            loaded: plants.len(),
            invalid,
            migrated,
            future_version: None,
        },
        records: plants,
        expired: Vec::new(),
    }
}

/// `refreshedAt` is present but is not a timestamp.
fn has_unparsable_refresh(value: &Value) -> bool {
    value
        .get("refreshedAt")
        .is_some_and(|at| serde_json::from_value::<DateTime<Utc>>(at.clone()).is_err())
}

/// Wrap a bare legacy profile in cache metadata derived from the profile.
fn legacy_profile_entry(value: &Value, default_ttl_days: u32) -> Option<CachedSpeciesEntry> {
    let profile: SpeciesProfile = serde_json::from_value(value.clone()).ok()?;
    Some(CachedSpeciesEntry {
        ttl_days: default_ttl_days,
        refreshed_at: profile.updated_at,
        source: profile.source,
        profile,
    })
}

pub(crate) fn sanitize_species(
    raw: Option<&Value>,
    default_ttl_days: u32,
) -> Sanitized<BTreeMap<String, CachedSpeciesEntry>> {
    let (records, legacy, migrated) = match classify(
        raw,
        SPECIES_CACHE_SCHEMA_VERSION,
        "entries",
        Value::is_object,
    ) {
        Shape::Absent => return Sanitized::empty(FamilyReport::default()),
        Shape::Future(version) => {
            return Sanitized::empty(FamilyReport {
                future_version: Some(version),
                ..FamilyReport::default()
            });
        }
        Shape::Unrecognized => {
            return Sanitized::empty(FamilyReport {
                invalid: 1,
                ..FamilyReport::default()
            });
        }
        Shape::Versioned { version, records } => (
            records,
            false,
            version < u64::from(SPECIES_CACHE_SCHEMA_VERSION),
        ),
        Shape::Legacy(records) => (records, true, true),
    };

    let mut cache = BTreeMap::new();
    let mut expired = Vec::new();
    let mut invalid = 0;
    for (species_key, value) in records.as_object().into_iter().flatten() {
        if has_unparsable_refresh(value) {
            tracing::debug!(species_key = %species_key, "expiring cache entry with unparsable refreshedAt");
            expired.push(normalize_key(species_key));
            continue;
        }
        let entry = if legacy && !is_persisted_species_cache_entry(value) {
            legacy_profile_entry(value, default_ttl_days)
        } else {
            serde_json::from_value::<CachedSpeciesEntry>(value.clone()).ok()
        };
        let entry = entry.map(|e| CachedSpeciesEntry {
            profile: e.profile.normalized(),
            ..e
        });
        match entry {
            Some(entry)
                if is_cached_species_entry(&entry)
                    && !cache.contains_key(&entry.profile.species_key) =>
            {
                cache.insert(entry.profile.species_key.clone(), entry);
            }
            _ => {
                tracing::debug!(species_key = %species_key, "dropping invalid species cache entry");
                invalid += 1;
            }
        }
    }

    Sanitized {
        report: FamilyReport {
            loaded: cache.len(),
            invalid,
            migrated,
            future_version: None,
        },
        records: cache,
        expired,
    }
}
