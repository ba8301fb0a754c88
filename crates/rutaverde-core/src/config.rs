use crate::error::{Result, RutaverdeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has at least the same precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for RutaVerde
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Base URL or directory holding the two GeoJSON documents
    pub data_url: ConfigValue<String>,
    pub zones_file: ConfigValue<String>,
    pub sites_file: ConfigValue<String>,
    /// Retries after the first failed fetch
    pub max_retries: ConfigValue<u32>,
    pub retry_base_ms: ConfigValue<u64>,
    pub retry_max_ms: ConfigValue<u64>,
    pub search_radius_km: ConfigValue<f64>,
    pub max_results: ConfigValue<usize>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_url: ConfigValue::new("public/data".to_string(), ConfigSource::Default),
            zones_file: ConfigValue::new("macrobarr.geojson".to_string(), ConfigSource::Default),
            sites_file: ConfigValue::new(
                "sitio_aprovechamiento_residuos.geojson".to_string(),
                ConfigSource::Default,
            ),
            max_retries: ConfigValue::new(2, ConfigSource::Default),
            retry_base_ms: ConfigValue::new(1000, ConfigSource::Default),
            retry_max_ms: ConfigValue::new(30_000, ConfigSource::Default),
            search_radius_km: ConfigValue::new(2.0, ConfigSource::Default),
            max_results: ConfigValue::new(10, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| RutaverdeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| RutaverdeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_url) = file_config.data_url {
            self.data_url.update(data_url, ConfigSource::File);
        }
        if let Some(zones_file) = file_config.zones_file {
            self.zones_file.update(zones_file, ConfigSource::File);
        }
        if let Some(sites_file) = file_config.sites_file {
            self.sites_file.update(sites_file, ConfigSource::File);
        }
        if let Some(max_retries) = file_config.max_retries {
            self.max_retries.update(max_retries, ConfigSource::File);
        }
        if let Some(retry_base_ms) = file_config.retry_base_ms {
            self.retry_base_ms.update(retry_base_ms, ConfigSource::File);
        }
        if let Some(retry_max_ms) = file_config.retry_max_ms {
            self.retry_max_ms.update(retry_max_ms, ConfigSource::File);
        }
        if let Some(radius) = file_config.search_radius_km {
            self.search_radius_km.update(parse_radius(radius)?, ConfigSource::File);
        }
        if let Some(max_results) = file_config.max_results {
            self.max_results.update(max_results, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(data_url) = env::var("RUTAVERDE_DATA_URL") {
            self.data_url.update(data_url, ConfigSource::Environment);
        }
        if let Ok(zones_file) = env::var("RUTAVERDE_ZONES_FILE") {
            self.zones_file.update(zones_file, ConfigSource::Environment);
        }
        if let Ok(sites_file) = env::var("RUTAVERDE_SITES_FILE") {
            self.sites_file.update(sites_file, ConfigSource::Environment);
        }
        if let Some(max_retries) = env_number("RUTAVERDE_MAX_RETRIES") {
            self.max_retries.update(max_retries, ConfigSource::Environment);
        }
        if let Some(retry_base_ms) = env_number("RUTAVERDE_RETRY_BASE_MS") {
            self.retry_base_ms.update(retry_base_ms, ConfigSource::Environment);
        }
        if let Some(retry_max_ms) = env_number("RUTAVERDE_RETRY_MAX_MS") {
            self.retry_max_ms.update(retry_max_ms, ConfigSource::Environment);
        }
        if let Some(radius) = env_number::<f64>("RUTAVERDE_SEARCH_RADIUS_KM") {
            match parse_radius(radius) {
                Ok(radius) => self.search_radius_km.update(radius, ConfigSource::Environment),
                Err(e) => tracing::warn!("Ignoring RUTAVERDE_SEARCH_RADIUS_KM: {}", e),
            }
        }
        if let Some(max_results) = env_number("RUTAVERDE_MAX_RESULTS") {
            self.max_results.update(max_results, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_url) = overrides.data_url {
            self.data_url.update(data_url, ConfigSource::Cli);
        }
        if let Some(radius) = overrides.search_radius_km {
            self.search_radius_km.update(radius, ConfigSource::Cli);
        }
        if let Some(max_results) = overrides.max_results {
            self.max_results.update(max_results, ConfigSource::Cli);
        }
    }

    /// Whether documents are fetched over HTTP rather than read from disk
    pub fn is_remote(&self) -> bool {
        let url = self.data_url.value.as_str();
        url.starts_with("http://") || url.starts_with("https://")
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_ms.value)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_ms.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert("data_url".to_string(), (self.data_url.value.clone(), self.data_url.source));
        map.insert(
            "zones_file".to_string(),
            (self.zones_file.value.clone(), self.zones_file.source),
        );
        map.insert(
            "sites_file".to_string(),
            (self.sites_file.value.clone(), self.sites_file.source),
        );
        map.insert(
            "max_retries".to_string(),
            (self.max_retries.value.to_string(), self.max_retries.source),
        );
        map.insert(
            "retry_base_ms".to_string(),
            (self.retry_base_ms.value.to_string(), self.retry_base_ms.source),
        );
        map.insert(
            "retry_max_ms".to_string(),
            (self.retry_max_ms.value.to_string(), self.retry_max_ms.source),
        );
        map.insert(
            "search_radius_km".to_string(),
            (self.search_radius_km.value.to_string(), self.search_radius_km.source),
        );
        map.insert(
            "max_results".to_string(),
            (self.max_results.value.to_string(), self.max_results.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_url: Option<String>,
    zones_file: Option<String>,
    sites_file: Option<String>,
    max_retries: Option<u32>,
    retry_base_ms: Option<u64>,
    retry_max_ms: Option<u64>,
    search_radius_km: Option<f64>,
    max_results: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_url: Option<String>,
    pub search_radius_km: Option<f64>,
    pub max_results: Option<usize>,
}

/// A search radius must be a positive, finite number of kilometres.
pub fn parse_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(RutaverdeError::ConfigInvalid {
            key: "search_radius_km".to_string(),
            reason: format!("Radius must be a positive number of kilometres, got {}", radius),
        })
    }
}

fn env_number<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected a number", key, raw);
            None
        }
    }
}
