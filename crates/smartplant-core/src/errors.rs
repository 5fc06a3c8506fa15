//! Cross-cutting error types for SmartPlant.
//!
//! Storage-specific errors (`StorageError`, `SchemaError`) are defined in
//! their respective crates.

use thiserror::Error;

/// Errors that can be raised by any SmartPlant crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed a domain invariant (empty id, zero TTL, ...).
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_defect() {
        let err = CoreError::Validation("plant 'p1' must have a species key".into());
        assert_eq!(
            err.to_string(),
            "Validation error: plant 'p1' must have a species key"
        );
    }
}
