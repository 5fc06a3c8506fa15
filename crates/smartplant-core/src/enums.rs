//! Enumerations used by species profiles and moisture policies.
//!
//! Wire names follow the persisted JSON format: humidity and provenance are
//! lower-case words, light and species type use `kebab-case`
//! (`bright-indirect`, `semi-succulent`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// HumidityPreference
// ---------------------------------------------------------------------------

/// Ambient humidity a species prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum HumidityPreference {
    Low,
    Medium,
    High,
}

impl HumidityPreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for HumidityPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LightRequirement
// ---------------------------------------------------------------------------

/// Light level a species needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LightRequirement {
    Low,
    Medium,
    BrightIndirect,
    FullSun,
}

impl LightRequirement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::BrightIndirect => "bright-indirect",
            Self::FullSun => "full-sun",
        }
    }
}

impl fmt::Display for LightRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SpeciesType
// ---------------------------------------------------------------------------

/// Broad care family of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SpeciesType {
    Succulent,
    SemiSucculent,
    Tropical,
    Fern,
    Other,
}

impl SpeciesType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succulent => "succulent",
            Self::SemiSucculent => "semi-succulent",
            Self::Tropical => "tropical",
            Self::Fern => "fern",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SpeciesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProfileSource
// ---------------------------------------------------------------------------

/// Where a species profile came from.
///
/// `Chatgpt` is the policy generation service, `Seed` the static fallback
/// data, `Cache` a profile re-served from the species cache, and `Manual` a
/// user edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Chatgpt,
    Seed,
    Cache,
    Manual,
}

impl ProfileSource {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chatgpt => "chatgpt",
            Self::Seed => "seed",
            Self::Cache => "cache",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
