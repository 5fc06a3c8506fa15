//! Schema validation error types.

use thiserror::Error;

/// Errors from payload validation and the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A payload written under a well-known key has the wrong structure.
    #[error("Invalid payload for key '{key}': {defect}")]
    InvalidPayload {
        /// Storage key the payload was written under.
        key: String,
        /// What is structurally wrong with it.
        defect: String,
    },

    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),
}
