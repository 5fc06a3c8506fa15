//! Plant store scenarios run against every storage backend.
//!
//! Each case opens a fresh adapter, drives one or more `PlantStore`
//! instances over it, and checks what a later hydration sees.

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use common::{
    Backend, Harness, PLANTS_KEY, SPECIES_KEY, cached_entry, ficus_lyrata, plant, t0,
};
use smartplant_schema::PLANTS_SCHEMA_VERSION;
use smartplant_store::{SpeciesCacheMetadata, StorageAdapter, StorageError};

#[rstest]
#[case::memory(Backend::Memory)]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn species_expiry_walkthrough(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    let mut store = harness.store(t0());
    store.hydrate().await.unwrap();
    assert!(store.list_plants().is_empty());

    store
        .upsert_species_profile(ficus_lyrata(), SpeciesCacheMetadata::with_ttl_days(30))
        .await
        .unwrap();
    store.upsert_plant(plant("p1", "ficus-lyrata")).await.unwrap();
    assert_eq!(
        store
            .get_plant("p1")
            .and_then(|p| p.species_profile)
            .map(|p| p.canonical_name)
            .as_deref(),
        Some("Ficus lyrata")
    );

    // A second store over the same backend sees the same data.
    let mut reopened = harness.store(t0() + Duration::days(1));
    let report = reopened.hydrate().await.unwrap();
    assert!(!report.persisted);
    assert_eq!(reopened.get_state(), store.get_state());

    let expired = reopened
        .purge_stale_species(t0() + Duration::days(31))
        .await
        .unwrap();
    assert_eq!(expired, vec!["ficus-lyrata".to_string()]);
    let p1 = reopened.get_plant("p1").unwrap();
    assert_eq!(p1.species_profile, None);

    let mut third = harness.store(t0());
    third.hydrate().await.unwrap();
    assert!(third.list_species_profiles().is_empty());
    assert_eq!(third.list_plants().len(), 1);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn hydrate_twice_yields_identical_state(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    let mut writer = harness.store(t0());
    writer.hydrate().await.unwrap();
    writer.upsert_plant(plant("b", "fern")).await.unwrap();
    writer.upsert_plant(plant("a", "fern")).await.unwrap();

    let mut first = harness.store(t0());
    first.hydrate().await.unwrap();
    let mut second = harness.store(t0());
    second.hydrate().await.unwrap();

    assert_eq!(first.get_state(), second.get_state());
    let ids: Vec<_> = first.list_plants().into_iter().map(|p| p.plant.id).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn legacy_plants_are_migrated_to_an_envelope(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    harness
        .seed_raw_plants(&json!([
            {"id": "p1", "speciesKey": "Ficus-Lyrata", "createdAt": "2026-01-01T00:00:00Z", "updatedAt": "2026-01-01T00:00:00Z"},
            {"id": "p2", "speciesKey": "fern", "createdAt": "2026-01-01T00:00:00Z", "updatedAt": "2026-01-01T00:00:00Z"}
        ]))
        .await;

    let mut store = harness.store(t0());
    let report = store.hydrate().await.unwrap();
    assert!(report.plants.migrated);
    assert_eq!(store.list_plants().len(), 2);
    assert_eq!(store.get_plant("p1").unwrap().plant.species_key, "ficus-lyrata");

    let stored = harness.adapter().get(PLANTS_KEY).await.unwrap().unwrap();
    assert_eq!(stored["schemaVersion"], PLANTS_SCHEMA_VERSION);
    assert_eq!(stored["plants"].as_array().map(Vec::len), Some(2));
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn future_version_leaves_nothing_behind(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    harness
        .seed_raw_plants(&json!({
            "schemaVersion": PLANTS_SCHEMA_VERSION + 1,
            "plants": [{"id": "p1", "speciesKey": "fern", "futureField": true}]
        }))
        .await;

    let mut store = harness.store(t0());
    let report = store.hydrate().await.unwrap();
    assert!(report.plants.future_version.is_some());
    assert!(store.list_plants().is_empty());
    assert_eq!(harness.adapter().get(PLANTS_KEY).await.unwrap(), None);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn empty_collection_is_distinct_from_never_written(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    let mut store = harness.store(t0());
    store.hydrate().await.unwrap();
    store.upsert_plant(plant("p1", "fern")).await.unwrap();
    store.remove_plant("p1").await.unwrap();

    assert_eq!(
        harness.adapter().get(PLANTS_KEY).await.unwrap(),
        Some(json!({"schemaVersion": PLANTS_SCHEMA_VERSION, "plants": []}))
    );

    store.clear().await.unwrap();
    assert_eq!(harness.adapter().get(PLANTS_KEY).await.unwrap(), None);
    assert_eq!(harness.adapter().get(SPECIES_KEY).await.unwrap(), None);
}

#[rstest]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn validating_backends_reject_malformed_envelopes(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    let adapter = harness.adapter();

    let err = adapter
        .set(PLANTS_KEY, &json!({"schemaVersion": 1, "plants": [{"speciesKey": "fern"}]}))
        .await
        .unwrap_err();
    match err {
        StorageError::Validation(e) => {
            let message = e.to_string();
            assert!(message.contains(PLANTS_KEY), "{message}");
            assert!(message.contains("`id`"), "{message}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let err = adapter
        .set(
            SPECIES_KEY,
            &json!({"schemaVersion": 1, "entries": {"fern": {"profile": {}}}}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));
    assert_eq!(adapter.get(PLANTS_KEY).await.unwrap(), None);
}

#[rstest]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn undecodable_payload_does_not_block_hydration(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    harness.seed_corrupt_plants().await;

    let mut store = harness.store(t0());
    let report = store.hydrate().await.unwrap();
    assert!(store.is_hydrated());
    assert_eq!(report.plants.invalid, 1);
    assert!(report.persisted);
    assert!(store.list_plants().is_empty());
    assert_eq!(
        harness.adapter().get(PLANTS_KEY).await.unwrap(),
        Some(json!({"schemaVersion": PLANTS_SCHEMA_VERSION, "plants": []}))
    );

    store.upsert_plant(plant("p1", "fern")).await.unwrap();
    let mut reopened = harness.store(t0());
    let report = reopened.hydrate().await.unwrap();
    assert_eq!(report.plants.invalid, 0);
    assert_eq!(reopened.list_plants().len(), 1);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::key_value(Backend::KeyValue)]
#[case::sql(Backend::Sql)]
#[tokio::test]
async fn unparsable_refresh_time_never_reaches_state(#[case] backend: Backend) {
    let harness = Harness::open(backend).await;
    let mut fern = ficus_lyrata();
    fern.species_key = "fern".into();
    fern.canonical_name = "Nephrolepis exaltata".into();
    harness
        .seed_raw_species(&json!({
            "schemaVersion": 1,
            "entries": {
                "ficus-lyrata": cached_entry(&ficus_lyrata(), 30, "early march"),
                "fern": cached_entry(&fern, 30, "2026-03-01T00:00:00Z")
            }
        }))
        .await;

    let mut store = harness.store(t0());
    let report = store.hydrate().await.unwrap();
    assert_eq!(report.expired, vec!["ficus-lyrata".to_string()]);
    assert!(report.persisted);
    assert!(store.get_species_profile("ficus-lyrata").is_none());
    assert_eq!(
        store.get_species_profile("fern").map(|p| p.canonical_name).as_deref(),
        Some("Nephrolepis exaltata")
    );

    let mut reopened = harness.store(t0());
    let report = reopened.hydrate().await.unwrap();
    assert!(report.expired.is_empty());
    assert!(!report.persisted);
    assert_eq!(reopened.list_species_profiles().len(), 1);
}
