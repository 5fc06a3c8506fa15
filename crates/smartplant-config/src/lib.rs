//! # smartplant-config
//!
//! Layered configuration loading for SmartPlant using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SMARTPLANT_*` prefix, `__` as separator)
//! 2. Project-level `.smartplant/config.toml`
//! 3. User-level `~/.config/smartplant/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SMARTPLANT_STORAGE__BACKEND` -> `storage.backend`,
//! `SMARTPLANT_CACHE__DEFAULT_TTL_DAYS` -> `cache.default_ttl_days`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use smartplant_config::SmartPlantConfig;
//!
//! let config = SmartPlantConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.storage.backend);
//! ```

mod cache;
mod error;
mod general;
mod storage;

pub use cache::CacheConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use storage::{BackendKind, StorageConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SmartPlantConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SmartPlantConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if a loaded value breaks an invariant.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and callers can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".smartplant/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SMARTPLANT_").split("__"))
    }

    /// Check cross-field invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty namespace or a zero TTL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.namespace".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.cache.default_ttl_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.default_ttl_days".into(),
                reason: "must be a positive number of days".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("smartplant").join("config.toml"))
    }
}
