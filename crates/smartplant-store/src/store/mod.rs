//! The plant store: domain state on top of any [`StorageAdapter`].
//!
//! The store owns a single in-memory snapshot of plants and the species
//! cache. [`PlantStore::hydrate`] loads and sanitizes it; every mutation
//! persists the whole affected collection before the snapshot changes, then
//! notifies subscribers.

mod sanitize;
mod subscribers;

pub use sanitize::FamilyReport;
pub use subscribers::{Listener, SubscriptionId};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use smartplant_config::SmartPlantConfig;
use smartplant_core::entities::{CachedSpeciesEntry, Plant, ResolvedPlant, SpeciesProfile};
use smartplant_core::enums::ProfileSource;
use smartplant_core::errors::CoreError;
use smartplant_core::normalize::{is_cached_species_entry, is_plant, normalize_key};
use smartplant_schema::{
    DEFAULT_NAMESPACE, DEFAULT_SPECIES_TTL_DAYS, PersistedPlantsPayload,
    PersistedSpeciesCachePayload, StorageKeys,
};

use crate::adapter::StorageAdapter;
use crate::error::StorageError;
use sanitize::{Sanitized, sanitize_plants, sanitize_species};
use subscribers::Subscribers;

/// A payload as read back during hydration.
enum Stored {
    Value(Option<serde_json::Value>),
    /// The backend held text that does not decode as JSON.
    Corrupt,
}

/// Source of "now" for TTL checks.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The store's in-memory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantStoreState {
    pub plants: Vec<Plant>,
    pub species_cache: BTreeMap<String, CachedSpeciesEntry>,
}

/// Outcome of [`PlantStore::hydrate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrateReport {
    pub plants: FamilyReport,
    pub species: FamilyReport,
    /// Species keys purged because their TTL had elapsed or their
    /// `refreshedAt` could not be parsed, in key order.
    pub expired: Vec<String>,
    /// Whether a sanitized collection was written back to storage.
    pub persisted: bool,
}

/// Optional cache metadata for [`PlantStore::upsert_species_profile`].
///
/// Missing fields fall back to the store's default TTL and to the profile's
/// own `updated_at` and `source`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesCacheMetadata {
    pub ttl_days: Option<u32>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub source: Option<ProfileSource>,
}

impl SpeciesCacheMetadata {
    #[must_use]
    pub const fn with_ttl_days(ttl_days: u32) -> Self {
        Self {
            ttl_days: Some(ttl_days),
            refreshed_at: None,
            source: None,
        }
    }
}

/// Construction options for [`PlantStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub namespace: String,
    /// TTL for cache entries written without one, and for migrated legacy profiles.
    pub default_ttl_days: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_ttl_days: DEFAULT_SPECIES_TTL_DAYS,
        }
    }
}

impl StoreOptions {
    #[must_use]
    pub fn from_config(config: &SmartPlantConfig) -> Self {
        Self {
            namespace: config.storage.namespace.clone(),
            default_ttl_days: config.cache.default_ttl_days,
        }
    }
}

/// Owns plant and species cache state for one namespace.
///
/// Lifecycle: construct, [`hydrate`](Self::hydrate) once, then query and
/// mutate. Mutations before hydration fail with
/// [`StorageError::NotHydrated`]; [`clear`](Self::clear) works in any state.
///
/// There is no internal locking. Mutations take `&mut self`, so overlapping
/// writes through one store are ruled out by the borrow checker.
pub struct PlantStore {
    adapter: Arc<dyn StorageAdapter>,
    keys: StorageKeys,
    default_ttl_days: u32,
    clock: Clock,
    state: PlantStoreState,
    hydrated: bool,
    subscribers: Subscribers,
}

impl PlantStore {
    /// Create a store over `adapter` with the default namespace and TTL.
    #[must_use]
    pub fn new(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self::with_options(adapter, StoreOptions::default())
    }

    #[must_use]
    pub fn with_options(adapter: Arc<dyn StorageAdapter>, options: StoreOptions) -> Self {
        Self {
            adapter,
            keys: StorageKeys::for_namespace(&options.namespace),
            default_ttl_days: options.default_ttl_days,
            clock: Arc::new(Utc::now),
            state: PlantStoreState::default(),
            hydrated: false,
            subscribers: Subscribers::default(),
        }
    }

    /// Replace the wall clock used by hydration and [`purge_stale_species_now`](Self::purge_stale_species_now).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The storage keys this store reads and writes.
    #[must_use]
    pub const fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn ensure_hydrated(&self) -> Result<(), StorageError> {
        if self.hydrated {
            Ok(())
        } else {
            Err(StorageError::NotHydrated)
        }
    }

    // -----------------------------------------------------------------------
    // Hydration
    // -----------------------------------------------------------------------

    /// Load both collections, sanitize them, purge expired species and write
    /// back whatever changed.
    ///
    /// Corrupt records are dropped and counted rather than failing the call,
    /// and a stored value that is not valid JSON counts as one invalid record
    /// and is overwritten with an empty envelope. A payload from a newer
    /// schema version is discarded and its key removed from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the adapter fails to read, or to write back
    /// the sanitized state. The store stays unhydrated in that case.
    pub async fn hydrate(&mut self) -> Result<HydrateReport, StorageError> {
        let (raw_plants, raw_species) = tokio::try_join!(
            self.read_payload(&self.keys.plants),
            self.read_payload(&self.keys.species_cache),
        )?;
        let now = self.now();

        let plants = match raw_plants {
            Stored::Value(raw) => sanitize_plants(raw.as_ref(), now),
            Stored::Corrupt => Sanitized::corrupt(),
        };
        let species = match raw_species {
            Stored::Value(raw) => sanitize_species(raw.as_ref(), self.default_ttl_days),
            Stored::Corrupt => Sanitized::corrupt(),
        };
        let mut state = PlantStoreState {
            plants: plants.records,
            species_cache: species.records,
        };
        let mut expired = species.expired;
        expired.extend(purge_expired(&mut state.species_cache, now));
        expired.sort();
        expired.dedup();

        let mut report = HydrateReport {
            plants: plants.report,
            species: species.report,
            expired,
            persisted: false,
        };
        self.log_family(&self.keys.plants, &report.plants);
        self.log_family(&self.keys.species_cache, &report.species);

        if report.plants.future_version.is_some() {
            self.adapter.remove(&self.keys.plants).await?;
        } else if report.plants.needs_write_back() {
            self.persist_plants(&state.plants).await?;
            report.persisted = true;
        }

        if report.species.future_version.is_some() {
            self.adapter.remove(&self.keys.species_cache).await?;
        } else if report.species.needs_write_back() || !report.expired.is_empty() {
            self.persist_species(&state.species_cache).await?;
            report.persisted = true;
        }

        if !report.expired.is_empty() {
            tracing::info!(expired = ?report.expired, "purged stale species during hydrate");
        }

        self.state = state;
        self.hydrated = true;
        self.notify();
        Ok(report)
    }

    async fn read_payload(&self, key: &str) -> Result<Stored, StorageError> {
        match self.adapter.get(key).await {
            Ok(raw) => Ok(Stored::Value(raw)),
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(key = %key, error = %e, "stored payload is not valid JSON; discarding it");
                Ok(Stored::Corrupt)
            }
            Err(e) => Err(e),
        }
    }

    fn log_family(&self, key: &str, report: &FamilyReport) {
        if let Some(version) = report.future_version {
            tracing::warn!(
                key = %key,
                version,
                "persisted schema version is newer than supported; discarding and wiping key"
            );
        }
        if report.invalid > 0 {
            tracing::warn!(key = %key, dropped = report.invalid, "dropped invalid records during hydrate");
        }
        if report.migrated {
            tracing::info!(key = %key, loaded = report.loaded, "migrated legacy payload");
        }
    }

    // -----------------------------------------------------------------------
    // TTL purge
    // -----------------------------------------------------------------------

    /// Remove every species cache entry that is stale at `reference`.
    ///
    /// Returns the removed keys in key order. Storage is written and
    /// subscribers notified only when something expired.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotHydrated` before hydration, or the adapter's
    /// error if the write fails (the in-memory cache is then left unchanged).
    pub async fn purge_stale_species(
        &mut self,
        reference: DateTime<Utc>,
    ) -> Result<Vec<String>, StorageError> {
        self.ensure_hydrated()?;
        let mut cache = self.state.species_cache.clone();
        let expired = purge_expired(&mut cache, reference);
        if expired.is_empty() {
            return Ok(expired);
        }
        self.persist_species(&cache).await?;
        self.state.species_cache = cache;
        tracing::info!(expired = ?expired, "purged stale species");
        self.notify();
        Ok(expired)
    }

    /// [`purge_stale_species`](Self::purge_stale_species) at the store clock's "now".
    ///
    /// # Errors
    ///
    /// Same as [`Self::purge_stale_species`].
    pub async fn purge_stale_species_now(&mut self) -> Result<Vec<String>, StorageError> {
        let now = self.now();
        self.purge_stale_species(now).await
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    fn resolve(&self, plant: &Plant) -> ResolvedPlant {
        ResolvedPlant {
            plant: plant.clone(),
            species_profile: self
                .state
                .species_cache
                .get(&plant.species_key)
                .map(|entry| entry.profile.clone()),
        }
    }

    /// All plants, each joined with its cached species profile.
    #[must_use]
    pub fn list_plants(&self) -> Vec<ResolvedPlant> {
        self.state.plants.iter().map(|p| self.resolve(p)).collect()
    }

    /// Look up a plant. Surrounding whitespace in `id` is ignored, as it is
    /// on upsert.
    #[must_use]
    pub fn get_plant(&self, id: &str) -> Option<ResolvedPlant> {
        let id = id.trim();
        self.state
            .plants
            .iter()
            .find(|p| p.id == id)
            .map(|p| self.resolve(p))
    }

    #[must_use]
    pub fn list_species_profiles(&self) -> Vec<SpeciesProfile> {
        self.state
            .species_cache
            .values()
            .map(|entry| entry.profile.clone())
            .collect()
    }

    /// Look up a cached profile. The key is normalized first.
    #[must_use]
    pub fn get_species_profile(&self, species_key: &str) -> Option<SpeciesProfile> {
        self.get_cached_species_entry(species_key)
            .map(|entry| entry.profile)
    }

    /// The full cache entry, TTL metadata included.
    #[must_use]
    pub fn get_cached_species_entry(&self, species_key: &str) -> Option<CachedSpeciesEntry> {
        self.state
            .species_cache
            .get(&normalize_key(species_key))
            .cloned()
    }

    #[must_use]
    pub fn list_cached_species_entries(&self) -> Vec<CachedSpeciesEntry> {
        self.state.species_cache.values().cloned().collect()
    }

    /// An owned copy of the current snapshot.
    #[must_use]
    pub fn get_state(&self) -> PlantStoreState {
        self.state.clone()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Insert or replace a plant by id.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotHydrated` before hydration.
    /// - `StorageError::InvalidInput` if the normalized plant has an empty id
    ///   or species key, or an out-of-range override.
    /// - Any adapter error from the write; state is unchanged in that case.
    pub async fn upsert_plant(&mut self, plant: Plant) -> Result<ResolvedPlant, StorageError> {
        self.ensure_hydrated()?;
        let plant = plant.normalized();
        if !is_plant(&plant) {
            return Err(CoreError::Validation(format!(
                "plant '{}' must have a non-empty id and species key",
                plant.id
            ))
            .into());
        }

        let mut plants = self.state.plants.clone();
        match plants.iter_mut().find(|p| p.id == plant.id) {
            Some(slot) => *slot = plant.clone(),
            None => plants.push(plant.clone()),
        }
        self.persist_plants(&plants).await?;
        self.state.plants = plants;
        self.notify();
        Ok(self.resolve(&plant))
    }

    /// Remove a plant by id. Returns `false` (and writes nothing) if absent.
    ///
    /// # Errors
    ///
    /// `StorageError::NotHydrated` before hydration, or the adapter's error.
    pub async fn remove_plant(&mut self, id: &str) -> Result<bool, StorageError> {
        self.ensure_hydrated()?;
        let id = id.trim();
        let Some(idx) = self.state.plants.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let mut plants = self.state.plants.clone();
        plants.remove(idx);
        self.persist_plants(&plants).await?;
        self.state.plants = plants;
        self.notify();
        Ok(true)
    }

    /// Insert or refresh a species profile in the cache.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotHydrated` before hydration.
    /// - `StorageError::InvalidInput` for a zero TTL or a profile that fails
    ///   validation after normalization.
    /// - Any adapter error from the write; state is unchanged in that case.
    pub async fn upsert_species_profile(
        &mut self,
        profile: SpeciesProfile,
        metadata: SpeciesCacheMetadata,
    ) -> Result<CachedSpeciesEntry, StorageError> {
        self.ensure_hydrated()?;
        let profile = profile.normalized();
        let entry = CachedSpeciesEntry {
            ttl_days: metadata.ttl_days.unwrap_or(self.default_ttl_days),
            refreshed_at: metadata.refreshed_at.unwrap_or(profile.updated_at),
            source: metadata.source.unwrap_or(profile.source),
            profile,
        };
        if !is_cached_species_entry(&entry) {
            return Err(CoreError::Validation(format!(
                "species '{}' needs a key, a canonical name and a positive TTL",
                entry.profile.species_key
            ))
            .into());
        }

        let mut cache = self.state.species_cache.clone();
        cache.insert(entry.profile.species_key.clone(), entry.clone());
        self.persist_species(&cache).await?;
        self.state.species_cache = cache;
        self.notify();
        Ok(entry)
    }

    /// Wipe both keys from storage and reset to an empty, hydrated snapshot.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if either removal fails.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.adapter.remove(&self.keys.plants).await?;
        self.adapter.remove(&self.keys.species_cache).await?;
        self.state = PlantStoreState::default();
        self.hydrated = true;
        self.notify();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Subscribers
    // -----------------------------------------------------------------------

    /// Register a listener called with the new snapshot after each change.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&PlantStoreState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.add(Box::new(listener))
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn notify(&self) {
        self.subscribers.notify(&self.state);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    async fn persist_plants(&self, plants: &[Plant]) -> Result<(), StorageError> {
        let payload = serde_json::to_value(PersistedPlantsPayload::current(plants.to_vec()))?;
        self.adapter.set(&self.keys.plants, &payload).await
    }

    async fn persist_species(
        &self,
        cache: &BTreeMap<String, CachedSpeciesEntry>,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_value(PersistedSpeciesCachePayload::current(cache.clone()))?;
        self.adapter.set(&self.keys.species_cache, &payload).await
    }
}

/// Drop stale entries from `cache`, returning their keys.
fn purge_expired(
    cache: &mut BTreeMap<String, CachedSpeciesEntry>,
    reference: DateTime<Utc>,
) -> Vec<String> {
    let expired: Vec<String> = cache
        .iter()
        .filter(|(_, entry)| entry.is_stale(reference))
        .map(|(key, _)| key.clone())
        .collect();
    for key in &expired {
        cache.remove(key);
    }
    expired
}
