use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{MoisturePolicy, SpeciesProfile};
use crate::normalize::{MAX_NOTE_CHARS, normalize_key, normalize_optional_text, truncate_chars};

/// A plant owned by the user, as persisted.
///
/// `species_key` is a lookup key into the species cache, not an owned copy of
/// the profile. The resolved profile is attached at read time, see
/// [`ResolvedPlant`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub species_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_watered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Per-plant policy that takes precedence over the cached species policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture_policy_override: Option<MoisturePolicy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plant {
    /// Trim text, lower-case the species key, cut notes to 160 characters,
    /// and clamp the override policy.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            species_key: normalize_key(&self.species_key),
            nickname: normalize_optional_text(self.nickname),
            location: normalize_optional_text(self.location),
            photo_uri: normalize_optional_text(self.photo_uri),
            environment: normalize_optional_text(self.environment),
            last_watered_at: self.last_watered_at,
            notes: self
                .notes
                .map(|n| truncate_chars(&n, MAX_NOTE_CHARS))
                .filter(|n| !n.is_empty()),
            moisture_policy_override: self.moisture_policy_override.map(MoisturePolicy::normalized),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A plant joined with its cached species profile.
///
/// Produced by the store on every read; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlant {
    #[serde(flatten)]
    pub plant: Plant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_profile: Option<SpeciesProfile>,
}

impl ResolvedPlant {
    /// The policy that applies to this plant: the override when present,
    /// otherwise the cached species policy.
    #[must_use]
    pub fn effective_policy(&self) -> Option<&MoisturePolicy> {
        self.plant
            .moisture_policy_override
            .as_ref()
            .or_else(|| self.species_profile.as_ref().map(|p| &p.moisture_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{HumidityPreference, LightRequirement, ProfileSource, SpeciesType};
    use crate::normalize::is_plant;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn plant() -> Plant {
        Plant {
            id: " p1 ".into(),
            species_key: "Ficus-Lyrata".into(),
            nickname: Some("  Figgy ".into()),
            location: Some("".into()),
            photo_uri: None,
            environment: Some("indoor".into()),
            last_watered_at: None,
            notes: Some(format!("  {}", "n".repeat(170))),
            moisture_policy_override: None,
            created_at: ts("2026-03-01T00:00:00Z"),
            updated_at: ts("2026-03-02T00:00:00Z"),
        }
    }

    fn policy(days: u32) -> MoisturePolicy {
        MoisturePolicy {
            water_interval_days: days,
            soil_moisture_threshold: 20,
            humidity: HumidityPreference::Low,
            light: LightRequirement::FullSun,
            notes: vec![],
        }
    }

    #[test]
    fn normalization_trims_and_truncates() {
        let p = plant().normalized();
        assert_eq!(p.id, "p1");
        assert_eq!(p.species_key, "ficus-lyrata");
        assert_eq!(p.nickname.as_deref(), Some("Figgy"));
        assert_eq!(p.location, None);
        assert_eq!(p.notes.as_ref().map(|n| n.chars().count()), Some(160));
        assert!(is_plant(&p));
    }

    #[test]
    fn empty_id_fails_predicate() {
        let mut p = plant();
        p.id = "   ".into();
        assert!(!is_plant(&p.normalized()));
    }

    #[test]
    fn override_wins_over_species_policy() {
        let profile = SpeciesProfile {
            species_key: "ficus-lyrata".into(),
            canonical_name: "Ficus lyrata".into(),
            common_name: None,
            species_type: SpeciesType::Tropical,
            confidence: None,
            moisture_policy: policy(7),
            source: ProfileSource::Seed,
            updated_at: ts("2026-03-01T00:00:00Z"),
            created_at: None,
        };
        let mut resolved = ResolvedPlant {
            plant: plant().normalized(),
            species_profile: Some(profile),
        };
        assert_eq!(resolved.effective_policy().map(|p| p.water_interval_days), Some(7));

        resolved.plant.moisture_policy_override = Some(policy(3));
        assert_eq!(resolved.effective_policy().map(|p| p.water_interval_days), Some(3));
    }

    #[test]
    fn resolved_plant_flattens_record_fields() {
        let resolved = ResolvedPlant {
            plant: plant().normalized(),
            species_profile: None,
        };
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["id"], "p1");
        assert!(json.get("speciesProfile").is_none());
        assert!(json.get("plant").is_none());
    }
}
