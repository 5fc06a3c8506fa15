//! # smartplant-core
//!
//! Domain types, normalization, and predicates for the SmartPlant tracker.
//!
//! This crate provides the types shared across all SmartPlant crates:
//! - Entity structs for plants, species profiles, and moisture policies
//! - Enumerations for humidity, light, species type, and provenance
//! - Normalization (trim, lower-case, clamp, truncate) applied before storage
//! - Domain predicates used to drop corrupt records during hydration
//! - Cross-cutting error types
//!
//! Nothing in this crate performs I/O.

pub mod entities;
pub mod enums;
pub mod errors;
pub mod normalize;
