//! Structural predicates and validators for persisted payloads.
//!
//! Checks are by shape only: an envelope object, an integer `schemaVersion`,
//! the collection field, and the identifying fields of each record. Whether a
//! record is semantically valid is decided later by the domain predicates in
//! `smartplant_core::normalize`.

use serde_json::Value;

use crate::error::SchemaError;

/// Read the `schemaVersion` tag of an envelope, if present and integral.
#[must_use]
pub fn schema_version_of(value: &Value) -> Option<u32> {
    value
        .get("schemaVersion")?
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
}

fn plants_payload_defect(value: &Value) -> Option<String> {
    let Some(envelope) = value.as_object() else {
        return Some("expected an envelope object { schemaVersion, plants }".into());
    };
    if schema_version_of(value).is_none() {
        return Some("missing or non-integer `schemaVersion`".into());
    }
    let Some(plants) = envelope.get("plants").and_then(Value::as_array) else {
        return Some("envelope field `plants` must be an array".into());
    };
    for (idx, plant) in plants.iter().enumerate() {
        if !plant.is_object() {
            return Some(format!("plants[{idx}] is not an object"));
        }
        if !plant.get("id").is_some_and(Value::is_string) {
            return Some(format!("plants[{idx}] is missing the `id` field"));
        }
    }
    None
}

fn species_entry_defect(entry: &Value) -> Option<String> {
    if !entry.is_object() {
        return Some("cache entry is not an object".into());
    }
    if !entry.get("profile").is_some_and(Value::is_object) {
        return Some("cache entry is missing `profile`".into());
    }
    if !entry.get("ttlDays").is_some_and(Value::is_u64) {
        return Some("missing cache-entry metadata `ttlDays`".into());
    }
    if !entry.get("refreshedAt").is_some_and(Value::is_string) {
        return Some("missing cache-entry metadata `refreshedAt`".into());
    }
    if !entry.get("source").is_some_and(Value::is_string) {
        return Some("missing cache-entry metadata `source`".into());
    }
    None
}

fn species_payload_defect(value: &Value) -> Option<String> {
    let Some(envelope) = value.as_object() else {
        return Some("expected an envelope object { schemaVersion, entries }".into());
    };
    if schema_version_of(value).is_none() {
        return Some("missing or non-integer `schemaVersion`".into());
    }
    let Some(entries) = envelope.get("entries").and_then(Value::as_object) else {
        return Some("envelope field `entries` must be an object keyed by species".into());
    };
    entries.iter().find_map(|(species_key, entry)| {
        species_entry_defect(entry).map(|defect| format!("entries[\"{species_key}\"]: {defect}"))
    })
}

/// Whether `value` is shaped like a `PersistedPlantsPayload`.
#[must_use]
pub fn is_persisted_plants_payload(value: &Value) -> bool {
    plants_payload_defect(value).is_none()
}

/// Whether `value` is shaped like a `CachedSpeciesEntry`.
#[must_use]
pub fn is_persisted_species_cache_entry(value: &Value) -> bool {
    species_entry_defect(value).is_none()
}

/// Whether `value` is shaped like a `PersistedSpeciesCachePayload`.
#[must_use]
pub fn is_persisted_species_cache_payload(value: &Value) -> bool {
    species_payload_defect(value).is_none()
}

/// Validate a plants envelope written under `key`, returning it unchanged.
///
/// # Errors
///
/// Returns `SchemaError::InvalidPayload` naming `key` and the first
/// structural defect found.
pub fn validate_persisted_plants_payload<'a>(
    key: &str,
    value: &'a Value,
) -> Result<&'a Value, SchemaError> {
    match plants_payload_defect(value) {
        None => Ok(value),
        Some(defect) => Err(SchemaError::InvalidPayload {
            key: key.to_string(),
            defect,
        }),
    }
}

/// Validate a species cache envelope written under `key`, returning it unchanged.
///
/// # Errors
///
/// Returns `SchemaError::InvalidPayload` naming `key` and the first
/// structural defect found.
pub fn validate_persisted_species_payload<'a>(
    key: &str,
    value: &'a Value,
) -> Result<&'a Value, SchemaError> {
    match species_payload_defect(value) {
        None => Ok(value),
        Some(defect) => Err(SchemaError::InvalidPayload {
            key: key.to_string(),
            defect,
        }),
    }
}
