//! `behavior_intel.toml` loading with environment and flag overrides.
//!
//! Resolution order, lowest to highest precedence: built-in defaults, the
//! TOML file, `BEHAVIOR_INTEL_DATA_DIR`, then command-line flags.

use std::path::{Path, PathBuf};

use behavior_intel_analytics_models::RankingParams;
use behavior_intel_forecast::{ForecastError, ForecastHorizon};
use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not
/// given.
pub const CONFIG_FILE: &str = "behavior_intel.toml";

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "BEHAVIOR_INTEL_DATA_DIR";

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// `default_horizon` is outside `1..=12`.
    #[error(transparent)]
    Horizon(#[from] ForecastError),
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the five input CSV tables.
    pub data_dir: PathBuf,
    /// Forecast horizon used when `--horizon` is not given.
    pub default_horizon: i64,
    /// Districts shown in the ranking.
    pub ranking_limit: usize,
    /// Districts shown in the recommendation table.
    pub recommendation_limit: usize,
    /// States shown in the top-states table.
    pub top_states_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let limits = RankingParams::default();
        Self {
            data_dir: PathBuf::from("data"),
            default_horizon: 3,
            ranking_limit: limits.ranking_limit,
            recommendation_limit: limits.recommendation_limit,
            top_states_limit: limits.top_states_limit,
        }
    }
}

impl Config {
    /// Parses a TOML document. Absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the config file.
    ///
    /// An explicit `path` must exist. Without one, a missing
    /// [`CONFIG_FILE`] yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = path.map_or_else(
            || (PathBuf::from(CONFIG_FILE), false),
            |p| (p.to_path_buf(), true),
        );

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_toml(&text, &path)
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Loads the config file then applies the environment and flag
    /// overrides for `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unusable or the horizon is
    /// invalid.
    pub fn resolve(path: Option<&Path>, data_dir_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self::load(path)?
            .with_data_dir_override(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .with_data_dir_override(data_dir_flag);
        config.horizon()?;
        Ok(config)
    }

    /// Replaces `data_dir` if `data_dir` is `Some`.
    #[must_use]
    pub fn with_data_dir_override(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    /// The configured default forecast horizon.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidHorizon`] if it is outside `1..=12`.
    pub fn horizon(&self) -> Result<ForecastHorizon, ForecastError> {
        ForecastHorizon::new(self.default_horizon)
    }

    /// Row limits for the ranking views.
    #[must_use]
    pub const fn ranking_params(&self) -> RankingParams {
        RankingParams {
            ranking_limit: self.ranking_limit,
            recommendation_limit: self.recommendation_limit,
            top_states_limit: self.top_states_limit,
        }
    }
}
