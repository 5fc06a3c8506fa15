//! # smartplant-schema
//!
//! Versioned on-disk payload shapes for SmartPlant storage.
//!
//! This crate provides:
//! - Envelope types for the two persisted record families (plants and the
//!   species cache) and their schema version constants
//! - Storage key derivation, including the metadata key used by backends that
//!   track schema versions independently of row presence
//! - Structural predicates and validators checked by shape, with errors that
//!   name the offending key and defect
//! - `SchemaRegistry`: JSON Schemas of the persisted shapes for external tooling
//!
//! Nothing in this crate performs I/O. Deep semantic checks live with the
//! domain types in `smartplant-core`.

pub mod error;
pub mod keys;
pub mod payload;
pub mod registry;
pub mod validate;

pub use error::SchemaError;
pub use keys::{DEFAULT_NAMESPACE, StorageKeys, create_schema_metadata_key};
pub use payload::{
    DEFAULT_SPECIES_TTL_DAYS, PLANTS_SCHEMA_VERSION, PersistedPlantsPayload,
    PersistedSpeciesCachePayload, SPECIES_CACHE_SCHEMA_VERSION, SchemaMetadata,
};
pub use registry::SchemaRegistry;
pub use validate::{
    is_persisted_plants_payload, is_persisted_species_cache_entry,
    is_persisted_species_cache_payload, schema_version_of, validate_persisted_plants_payload,
    validate_persisted_species_payload,
};
