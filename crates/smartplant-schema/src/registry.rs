//! JSON Schema registry for persisted SmartPlant shapes.
//!
//! The `SchemaRegistry` builds JSON Schemas from the payload and entity types
//! at construction time using [`schemars::schema_for!`] and provides
//! validation via `jsonschema`. Storage does not depend on it; it exists so
//! that external tooling can inspect and check what the adapters write.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Central store of the JSON Schemas for every persisted shape.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Generate the schema for `$ty` and store it under `$name`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, schema_for!($ty).to_value());
    };
}

impl SchemaRegistry {
    /// Build a registry containing the envelope and record schemas.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // Envelopes
        register!(
            schemas,
            "plants_payload",
            crate::payload::PersistedPlantsPayload
        );
        register!(
            schemas,
            "species_cache_payload",
            crate::payload::PersistedSpeciesCachePayload
        );
        register!(schemas, "schema_metadata", crate::payload::SchemaMetadata);

        // Records
        register!(schemas, "plant", smartplant_core::entities::Plant);
        register!(
            schemas,
            "species_profile",
            smartplant_core::entities::SpeciesProfile
        );
        register!(
            schemas,
            "cached_species_entry",
            smartplant_core::entities::CachedSpeciesEntry
        );
        register!(
            schemas,
            "moisture_policy",
            smartplant_core::entities::MoisturePolicy
        );

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
