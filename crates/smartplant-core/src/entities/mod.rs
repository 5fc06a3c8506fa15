//! Entity structs for all SmartPlant domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` and use
//! `camelCase` field names, matching the persisted payload format.

mod cache;
mod plant;
mod policy;
mod species;

pub use cache::{CachedSpeciesEntry, MS_PER_DAY};
pub use plant::{Plant, ResolvedPlant};
pub use policy::MoisturePolicy;
pub use species::SpeciesProfile;
