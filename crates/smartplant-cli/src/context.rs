use anyhow::Context;
use smartplant_config::SmartPlantConfig;
use smartplant_store::{PlantStore, StoreOptions, open_adapter};

use crate::cli::GlobalFlags;

/// Load configuration and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SmartPlantConfig> {
    let mut config = SmartPlantConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(backend) = flags.backend {
        config.storage.backend = backend;
    }
    if let Some(namespace) = &flags.namespace {
        config.storage.namespace.clone_from(namespace);
    }
    config.validate()?;
    Ok(config)
}

/// Shared resources initialized once per invocation.
pub struct AppContext {
    pub config: SmartPlantConfig,
    pub store: PlantStore,
}

impl AppContext {
    /// Open the configured backend and build an unhydrated store over it.
    pub async fn init(config: SmartPlantConfig) -> anyhow::Result<Self> {
        let adapter = open_adapter(&config.storage)
            .await
            .with_context(|| format!("failed to open {} storage", config.storage.backend))?;
        let store = PlantStore::with_options(adapter, StoreOptions::from_config(&config));
        Ok(Self { config, store })
    }
}
