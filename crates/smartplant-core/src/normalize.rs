//! Normalization helpers and domain predicates.
//!
//! Every mutation normalizes its input before it reaches in-memory state, and
//! hydration runs the same normalization over persisted records before the
//! predicates decide whether a record is kept.

use crate::entities::{CachedSpeciesEntry, Plant, SpeciesProfile};

/// Upper bound for `MoisturePolicy::water_interval_days`.
pub const MAX_WATER_INTERVAL_DAYS: u32 = 60;

/// Upper bound for `MoisturePolicy::soil_moisture_threshold`.
pub const MAX_MOISTURE_THRESHOLD: u32 = 60;

/// Maximum number of notes kept on a policy.
pub const MAX_POLICY_NOTES: usize = 2;

/// Maximum length, in characters, of any stored note.
pub const MAX_NOTE_CHARS: usize = 160;

/// Normalize a lookup key: trimmed and lower-cased.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Trim `text` and cut it to at most `max` characters (not bytes).
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max) {
        Some((idx, _)) => trimmed[..idx].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

/// Trim an optional text field, mapping blank values to `None`.
#[must_use]
pub fn normalize_optional_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Domain predicate for plant records.
///
/// Checks invariants that survive normalization: a non-empty id and species
/// key, bounded notes, and an in-range override policy.
#[must_use]
pub fn is_plant(plant: &Plant) -> bool {
    !plant.id.trim().is_empty()
        && !plant.species_key.trim().is_empty()
        && plant
            .notes
            .as_ref()
            .is_none_or(|notes| notes.chars().count() <= MAX_NOTE_CHARS)
        && plant
            .moisture_policy_override
            .as_ref()
            .is_none_or(crate::entities::MoisturePolicy::is_within_limits)
}

/// Domain predicate for species profiles.
#[must_use]
pub fn is_species_profile(profile: &SpeciesProfile) -> bool {
    !profile.species_key.trim().is_empty()
        && !profile.canonical_name.trim().is_empty()
        && profile
            .confidence
            .is_none_or(|c| (0.0..=1.0).contains(&c))
        && profile.moisture_policy.is_within_limits()
}

/// Domain predicate for cache entries: a valid profile and a positive TTL.
#[must_use]
pub fn is_cached_species_entry(entry: &CachedSpeciesEntry) -> bool {
    entry.ttl_days > 0 && is_species_profile(&entry.profile)
}
