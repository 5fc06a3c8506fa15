//! # smartplant-store
//!
//! Persistence and caching for SmartPlant.
//!
//! - [`adapter`]: the asynchronous [`StorageAdapter`] contract and its
//!   backends: in-memory, JSON over a raw key-value store, and libSQL rows.
//! - [`store`]: [`PlantStore`], which owns the in-memory snapshot, runs the
//!   hydrate-time sanitize / migrate / purge pipeline and notifies
//!   subscribers.
//!
//! ```no_run
//! # async fn demo() -> Result<(), smartplant_store::StorageError> {
//! use std::sync::Arc;
//! use smartplant_store::{PlantStore, SqlAdapter};
//!
//! let adapter = SqlAdapter::open_local("smartplant.db", "smartplant").await?;
//! let mut store = PlantStore::new(Arc::new(adapter));
//! let report = store.hydrate().await?;
//! println!("{} plants loaded", report.plants.loaded);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod error;
pub mod helpers;
mod migrations;
pub mod store;
mod test_support;

pub use adapter::{
    DirectoryKeyValueStore, KeyValueAdapter, MemoryAdapter, MemoryKeyValueStore,
    RawKeyValueStore, SqlAdapter, StorageAdapter, open_adapter,
};
pub use error::StorageError;
pub use store::{
    Clock, FamilyReport, HydrateReport, Listener, PlantStore, PlantStoreState,
    SpeciesCacheMetadata, StoreOptions, SubscriptionId,
};
