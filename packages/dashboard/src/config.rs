//! Dashboard configuration.
//!
//! A default configuration is embedded at compile time from
//! `config/default.toml`. Binaries may load a different file instead, and
//! the `COMPLAINT_MAP_API_URL` environment variable overrides the service
//! URL after loading.

use std::path::Path;
use std::time::Duration;

use complaint_map_dashboard_models::{FilterState, HeatOptions, Viewport};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`SourceConfig::base_url`].
pub const API_URL_ENV: &str = "COMPLAINT_MAP_API_URL";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`DashboardConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted path of the offending key.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Where to fetch complaints from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Complaints endpoint URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Marker layer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Whether marker mode starts enabled.
    #[serde(default)]
    pub show: bool,
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub heat: HeatOptions,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub viewport: Viewport,
    /// Filters applied on mount.
    #[serde(default)]
    pub filters: FilterState,
}

impl DashboardConfig {
    /// The configuration embedded at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if parsing or validation fails.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` if given, otherwise the embedded defaults, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::embedded()?,
        };
        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replaces the service URL with `api_url` when it is non-empty.
    pub fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            log::info!("Using complaint service URL from {API_URL_ENV}: {url}");
            self.source.base_url = url;
        }
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source.base_url",
                message: "must not be empty".to_string(),
            });
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_secs",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.heat.radius == 0 {
            return Err(ConfigError::InvalidValue {
                field: "heat.radius",
                message: "must be greater than 0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.heat.min_opacity) {
            return Err(ConfigError::InvalidValue {
                field: "heat.min_opacity",
                message: format!("{} is outside [0, 1]", self.heat.min_opacity),
            });
        }
        Ok(())
    }
}
