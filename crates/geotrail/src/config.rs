//! Configuration management for geotrail.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::Coordinate;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "geotrail";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "locations.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "GEOTRAIL_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GEOTRAIL_`, sections split by `__`,
///    e.g. `GEOTRAIL_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/geotrail/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Capture configuration.
    pub capture: CaptureConfig,
    /// Fixed position used when no coordinate is given on the command line.
    pub provider: ProviderConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/geotrail/locations.db`
    pub database_path: Option<PathBuf>,
}

/// Capture-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// How long the provider may take to produce a sample, in milliseconds.
    pub provider_timeout_ms: u64,
}

/// Fixed-position provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Latitude reported by the fixed provider.
    pub latitude: Option<f64>,
    /// Longitude reported by the fixed provider.
    pub longitude: Option<f64>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading the TOML file at
    /// `config_path` or at [`Self::default_config_path`] when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.capture.provider_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "provider_timeout_ms must be greater than 0".to_string(),
            });
        }

        self.fixed_coordinate()?;
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the provider timeout as a Duration.
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.capture.provider_timeout_ms)
    }

    /// The configured fixed position, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if only one of latitude and
    /// longitude is set, or if the pair is out of range.
    pub fn fixed_coordinate(&self) -> Result<Option<Coordinate>> {
        match (self.provider.latitude, self.provider.longitude) {
            (None, None) => Ok(None),
            (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude)
                .map(Some)
                .map_err(|e| Error::ConfigValidation {
                    message: format!("provider position: {e}"),
                }),
            _ => Err(Error::ConfigValidation {
                message: "provider latitude and longitude must be set together".to_string(),
            }),
        }
    }
}
