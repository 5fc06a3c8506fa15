use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::SpeciesProfile;
use crate::enums::ProfileSource;

/// Milliseconds in one TTL day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// A species profile together with its cache-control metadata.
///
/// The metadata describes the cache slot, not the species: `refreshed_at` is
/// when the slot was last (re)populated, which may differ from
/// `profile.updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedSpeciesEntry {
    pub profile: SpeciesProfile,
    /// Positive number of days the entry stays fresh.
    pub ttl_days: u32,
    pub refreshed_at: DateTime<Utc>,
    pub source: ProfileSource,
}

impl CachedSpeciesEntry {
    /// Whether the entry has expired at `reference`.
    ///
    /// Stale once `reference - refreshed_at >= ttl_days` whole days, so an
    /// entry is still served one millisecond before its expiry instant.
    #[must_use]
    pub fn is_stale(&self, reference: DateTime<Utc>) -> bool {
        let elapsed_ms = (reference - self.refreshed_at).num_milliseconds();
        elapsed_ms >= i64::from(self.ttl_days) * MS_PER_DAY
    }

    /// The first instant at which [`is_stale`](Self::is_stale) returns `true`.
    ///
    /// `None` when that instant is past the last representable date, which
    /// a large `ttl_days` can reach.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
            .checked_add_signed(chrono::Duration::milliseconds(
                i64::from(self.ttl_days) * MS_PER_DAY,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MoisturePolicy;
    use crate::enums::{HumidityPreference, LightRequirement, SpeciesType};

    fn entry(ttl_days: u32) -> CachedSpeciesEntry {
        let refreshed_at: DateTime<Utc> = "2026-03-01T00:00:00Z".parse().unwrap();
        CachedSpeciesEntry {
            profile: SpeciesProfile {
                species_key: "ficus-lyrata".into(),
                canonical_name: "Ficus lyrata".into(),
                common_name: None,
                species_type: SpeciesType::Tropical,
                confidence: None,
                moisture_policy: MoisturePolicy {
                    water_interval_days: 7,
                    soil_moisture_threshold: 35,
                    humidity: HumidityPreference::Medium,
                    light: LightRequirement::BrightIndirect,
                    notes: vec![],
                },
                source: ProfileSource::Chatgpt,
                updated_at: refreshed_at,
                created_at: None,
            },
            ttl_days,
            refreshed_at,
            source: ProfileSource::Chatgpt,
        }
    }

    #[test]
    fn fresh_until_the_last_millisecond() {
        let e = entry(30);
        let expiry = e.expires_at().unwrap();
        assert!(!e.is_stale(expiry - chrono::Duration::milliseconds(1)));
        assert!(e.is_stale(expiry));
    }

    #[test]
    fn reference_before_refresh_is_fresh() {
        let e = entry(1);
        assert!(!e.is_stale(e.refreshed_at - chrono::Duration::days(3)));
    }

    #[test]
    fn huge_ttl_never_expires_and_has_no_expiry_instant() {
        let e = entry(u32::MAX);
        assert_eq!(e.expires_at(), None);
        assert!(!e.is_stale(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn zero_ttl_is_immediately_stale() {
        let e = entry(0);
        assert!(e.is_stale(e.refreshed_at));
    }
}
