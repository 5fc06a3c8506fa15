use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::MoisturePolicy;
use crate::enums::{ProfileSource, SpeciesType};
use crate::normalize::{normalize_key, normalize_optional_text};

/// Care profile for a species, shared by every plant of that species.
///
/// Profiles live in the species cache keyed by `species_key`; plants refer to
/// them by key and never embed a copy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesProfile {
    /// Normalized lower-case identifier, e.g. `ficus-lyrata`.
    pub species_key: String,
    pub canonical_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(rename = "type")]
    pub species_type: SpeciesType,
    /// Identification confidence in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub moisture_policy: MoisturePolicy,
    pub source: ProfileSource,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SpeciesProfile {
    /// Normalize keys and text, clamp confidence, and clamp the policy.
    ///
    /// A `NaN` confidence is dropped.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            species_key: normalize_key(&self.species_key),
            canonical_name: self.canonical_name.trim().to_string(),
            common_name: normalize_optional_text(self.common_name),
            species_type: self.species_type,
            confidence: self
                .confidence
                .filter(|c| !c.is_nan())
                .map(|c| c.clamp(0.0, 1.0)),
            moisture_policy: self.moisture_policy.normalized(),
            source: self.source,
            updated_at: self.updated_at,
            created_at: self.created_at,
        }
    }
}
