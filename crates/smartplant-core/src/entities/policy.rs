use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{HumidityPreference, LightRequirement};
use crate::normalize::{
    MAX_MOISTURE_THRESHOLD, MAX_NOTE_CHARS, MAX_POLICY_NOTES, MAX_WATER_INTERVAL_DAYS,
    truncate_chars,
};

/// Watering and placement guidance for a species or a single plant.
///
/// Always stored clamped: see [`MoisturePolicy::normalized`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoisturePolicy {
    /// Days between waterings, `0..=60`.
    pub water_interval_days: u32,
    /// Soil moisture percentage below which the plant needs water, `0..=60`.
    pub soil_moisture_threshold: u32,
    pub humidity: HumidityPreference,
    pub light: LightRequirement,
    /// At most two short care notes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl MoisturePolicy {
    /// Clamp numeric ranges and trim notes to the stored limits.
    ///
    /// Blank notes are dropped before the two-note limit is applied.
    #[must_use]
    pub fn normalized(self) -> Self {
        let notes = self
            .notes
            .iter()
            .map(|note| truncate_chars(note, MAX_NOTE_CHARS))
            .filter(|note| !note.is_empty())
            .take(MAX_POLICY_NOTES)
            .collect();
        Self {
            water_interval_days: self.water_interval_days.min(MAX_WATER_INTERVAL_DAYS),
            soil_moisture_threshold: self.soil_moisture_threshold.min(MAX_MOISTURE_THRESHOLD),
            humidity: self.humidity,
            light: self.light,
            notes,
        }
    }

    /// Whether every field is inside its stored range.
    #[must_use]
    pub fn is_within_limits(&self) -> bool {
        self.water_interval_days <= MAX_WATER_INTERVAL_DAYS
            && self.soil_moisture_threshold <= MAX_MOISTURE_THRESHOLD
            && self.notes.len() <= MAX_POLICY_NOTES
            && self
                .notes
                .iter()
                .all(|note| note.chars().count() <= MAX_NOTE_CHARS)
    }
}
