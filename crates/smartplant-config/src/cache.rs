//! Species cache configuration.

use serde::{Deserialize, Serialize};
use smartplant_schema::DEFAULT_SPECIES_TTL_DAYS;

const fn default_ttl_days() -> u32 {
    DEFAULT_SPECIES_TTL_DAYS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// TTL applied to species profiles upserted without explicit metadata
    /// and to legacy profiles migrated without TTL metadata.
    #[serde(default = "default_ttl_days")]
    pub default_ttl_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_days: default_ttl_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_180_days() {
        assert_eq!(CacheConfig::default().default_ttl_days, 180);
    }
}
