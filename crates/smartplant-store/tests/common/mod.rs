//! Fixtures shared by the store integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;

use smartplant_core::entities::{MoisturePolicy, Plant, SpeciesProfile};
use smartplant_core::enums::{HumidityPreference, LightRequirement, ProfileSource, SpeciesType};
use smartplant_store::{
    DirectoryKeyValueStore, KeyValueAdapter, MemoryAdapter, PlantStore, RawKeyValueStore,
    SqlAdapter, StorageAdapter,
};

pub const PLANTS_KEY: &str = "smartplant:plants";
pub const SPECIES_KEY: &str = "smartplant:species-cache";

#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    KeyValue,
    Sql,
}

/// One adapter plus whatever on-disk state keeps it alive.
pub enum Harness {
    Memory(Arc<MemoryAdapter>),
    KeyValue(Arc<KeyValueAdapter<DirectoryKeyValueStore>>, TempDir),
    Sql(Arc<SqlAdapter>, TempDir),
}

impl Harness {
    pub async fn open(backend: Backend) -> Self {
        match backend {
            Backend::Memory => Self::Memory(Arc::new(MemoryAdapter::new())),
            Backend::KeyValue => {
                let dir = TempDir::new().unwrap();
                let store = DirectoryKeyValueStore::new(dir.path().join("kv"));
                Self::KeyValue(Arc::new(KeyValueAdapter::new(store, "smartplant")), dir)
            }
            Backend::Sql => {
                let dir = TempDir::new().unwrap();
                let path = dir.path().join("smartplant.db");
                let adapter = SqlAdapter::open_local(path.to_str().unwrap(), "smartplant")
                    .await
                    .unwrap();
                Self::Sql(Arc::new(adapter), dir)
            }
        }
    }

    pub fn adapter(&self) -> Arc<dyn StorageAdapter> {
        match self {
            Self::Memory(a) => a.clone(),
            Self::KeyValue(a, _) => a.clone(),
            Self::Sql(a, _) => a.clone(),
        }
    }

    /// A fresh store over this harness's adapter with a pinned clock.
    pub fn store(&self, now: DateTime<Utc>) -> PlantStore {
        PlantStore::new(self.adapter()).with_clock(move || now)
    }

    /// Write a plants payload as an older build would have, bypassing
    /// the adapter's validation.
    pub async fn seed_raw_plants(&self, value: &Value) {
        match self {
            Self::Memory(a) => a.set(PLANTS_KEY, value).await.unwrap(),
            Self::KeyValue(a, _) => a
                .raw()
                .set_item(PLANTS_KEY, value.to_string())
                .await
                .unwrap(),
            Self::Sql(a, _) => {
                let records = value
                    .get("plants")
                    .unwrap_or(value)
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                for record in records {
                    let id = record["id"].as_str().unwrap_or_default().to_string();
                    a.conn()
                        .execute(
                            "INSERT INTO plants (namespace, plant_id, payload) VALUES ('smartplant', ?1, ?2)",
                            libsql::params![id, record.to_string()],
                        )
                        .await
                        .unwrap();
                }
                if let Some(version) = value.get("schemaVersion") {
                    let meta = json!({"schemaVersion": version, "updatedAt": "2026-01-01T00:00:00Z"});
                    a.conn()
                        .execute(
                            "INSERT INTO kv_store (namespace, key, payload) VALUES ('smartplant', ?1, ?2)",
                            libsql::params![format!("{PLANTS_KEY}__meta"), meta.to_string()],
                        )
                        .await
                        .unwrap();
                }
            }
        }
    }
}

impl Harness {
    /// Store text under the plants key that is not valid JSON.
    pub async fn seed_corrupt_plants(&self) {
        match self {
            // The memory adapter holds decoded values; there is no text to corrupt.
            Self::Memory(_) => panic!("memory backend cannot hold undecodable text"),
            Self::KeyValue(a, _) => a
                .raw()
                .set_item(PLANTS_KEY, "{not json".into())
                .await
                .unwrap(),
            Self::Sql(a, _) => {
                a.conn()
                    .execute(
                        "INSERT INTO plants (namespace, plant_id, payload) VALUES ('smartplant', 'p0', '{not json')",
                        (),
                    )
                    .await
                    .unwrap();
            }
        }
    }

    /// Write a species cache envelope without the adapter's validation.
    pub async fn seed_raw_species(&self, value: &Value) {
        match self {
            Self::Memory(a) => a.set(SPECIES_KEY, value).await.unwrap(),
            Self::KeyValue(a, _) => a
                .raw()
                .set_item(SPECIES_KEY, value.to_string())
                .await
                .unwrap(),
            Self::Sql(a, _) => {
                let entries = value["entries"].as_object().cloned().unwrap_or_default();
                for (species_key, entry) in entries {
                    let payload = json!({"schemaVersion": value["schemaVersion"], "profile": entry["profile"]});
                    a.conn()
                        .execute(
                            "INSERT INTO species_cache
                               (namespace, species_key, payload, ttl_days, refreshed_at, source)
                             VALUES ('smartplant', ?1, ?2, ?3, ?4, ?5)",
                            libsql::params![
                                species_key,
                                payload.to_string(),
                                entry["ttlDays"].as_i64().unwrap_or_default(),
                                entry["refreshedAt"].as_str().unwrap_or_default().to_string(),
                                entry["source"].as_str().unwrap_or_default().to_string()
                            ],
                        )
                        .await
                        .unwrap();
                }
                let meta = json!({"schemaVersion": value["schemaVersion"], "updatedAt": "2026-01-01T00:00:00Z"});
                a.conn()
                    .execute(
                        "INSERT INTO kv_store (namespace, key, payload) VALUES ('smartplant', ?1, ?2)",
                        libsql::params![format!("{SPECIES_KEY}__meta"), meta.to_string()],
                    )
                    .await
                    .unwrap();
            }
        }
    }
}

/// A persisted cache entry for `profile` with the given raw `refreshedAt`.
pub fn cached_entry(profile: &SpeciesProfile, ttl_days: u32, refreshed_at: &str) -> Value {
    json!({
        "profile": serde_json::to_value(profile).unwrap(),
        "ttlDays": ttl_days,
        "refreshedAt": refreshed_at,
        "source": "chatgpt"
    })
}

pub fn t0() -> DateTime<Utc> {
    "2026-03-01T00:00:00Z".parse().unwrap()
}

pub fn ficus_lyrata() -> SpeciesProfile {
    SpeciesProfile {
        species_key: "ficus-lyrata".into(),
        canonical_name: "Ficus lyrata".into(),
        common_name: Some("Fiddle-leaf fig".into()),
        species_type: SpeciesType::Tropical,
        confidence: Some(0.9),
        moisture_policy: MoisturePolicy {
            water_interval_days: 7,
            soil_moisture_threshold: 35,
            humidity: HumidityPreference::Medium,
            light: LightRequirement::BrightIndirect,
            notes: vec!["Rotate monthly".into()],
        },
        source: ProfileSource::Chatgpt,
        updated_at: t0(),
        created_at: Some(t0()),
    }
}

pub fn plant(id: &str, species_key: &str) -> Plant {
    Plant {
        id: id.into(),
        species_key: species_key.into(),
        nickname: Some("Figgy".into()),
        location: Some("Office".into()),
        photo_uri: None,
        environment: Some("indoor".into()),
        last_watered_at: Some(t0()),
        notes: None,
        moisture_policy_override: None,
        created_at: t0(),
        updated_at: t0(),
    }
}
