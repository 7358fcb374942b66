//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `nexus.toml` in the working directory, or the file named by
//! `NEXUS_CONFIG`. Every runtime section has a default so only the catalog
//! needs to be written down. Environment variables take precedence over file
//! values.

use std::collections::BTreeMap;
use std::time::Duration;

use nexus_domain::catalog::Catalog;
use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_PATH: &str = "nexus.toml";

/// Raw parameter tables per connector or handler kind.
pub type ParameterTables = BTreeMap<String, Vec<toml::Table>>;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Admission queue settings.
    pub admission: AdmissionConfig,
    /// Action resolution settings.
    pub resolution: ResolutionConfig,
    /// `[[connectors.<kind>]]` tables, one per raw input source.
    pub connectors: ParameterTables,
    /// `[[handlers.<kind>]]` tables, one per terminal handler.
    pub handlers: ParameterTables,
    /// Devices, activities, input mappings and templates.
    #[serde(flatten)]
    pub catalog: Catalog,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Admission queue configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// How long a source waits for the processor before dropping an event.
    pub offer_timeout_ms: u64,
}

/// Resolver configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Hops a single chain may take before it is considered a loop.
    pub max_hops: usize,
}

impl Config {
    /// Load configuration from `NEXUS_CONFIG` or `nexus.toml` (if present)
    /// then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed,
    /// or if the resulting configuration is inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("NEXUS_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path, "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("NEXUS_MAX_HOPS")
            && let Ok(max_hops) = val.parse()
        {
            self.resolution.max_hops = max_hops;
        }
        if let Ok(val) = std::env::var("NEXUS_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Check runtime settings and catalog invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution.max_hops == 0 {
            return Err(ConfigError::Validation(
                "max_hops must be non-zero".to_string(),
            ));
        }
        self.catalog
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }

    #[must_use]
    pub fn offer_timeout(&self) -> Duration {
        Duration::from_millis(self.admission.offer_timeout_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "nexusd=info,nexus=info".to_string(),
        }
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            offer_timeout_ms: 50,
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_hops: nexus_app::resolver::DEFAULT_MAX_HOPS,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.filter, "nexusd=info,nexus=info");
        assert_eq!(config.offer_timeout(), Duration::from_millis(50));
        assert_eq!(config.resolution.max_hops, 32);
        assert!(config.connectors.is_empty());
        assert!(config.catalog.devices.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.resolution.max_hops, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [logging]
            filter = "debug"

            [admission]
            offer_timeout_ms = 20

            [resolution]
            max_hops = 8

            [[connectors.input-device]]
            id = "remote"
            device = "/dev/input/event3"

            [[handlers.http]]
            id = "http"
            timeout_ms = 2000

            [[handlers.wol]]
            id = "wol"

            [[devices]]
            id = "tv"
            activation = ["wol:001122334455:192.168.1.255"]

            [devices.mappings]
            power = { action = "http://tv/power", method = "POST", payload = "toggle" }

            [[activities]]
            id = "watch-tv"
            participants = ["tv"]

            [input-mappings]
            "input-device:remote:KEY:POWER:short-pressed" = "activity:switch:watch-tv"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.offer_timeout(), Duration::from_millis(20));
        assert_eq!(config.resolution.max_hops, 8);
        assert_eq!(config.connectors["input-device"].len(), 1);
        assert_eq!(config.handlers["http"][0]["timeout_ms"].as_integer(), Some(2000));
        assert!(config.handlers.contains_key("wol"));

        let tv = config.catalog.device("tv").unwrap();
        let power = &tv.mappings["power"];
        assert_eq!(power.method.as_deref(), Some("POST"));
        assert_eq!(power.payload.as_deref(), Some("toggle"));
        assert!(config.catalog.activity("watch-tv").is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.resolution.max_hops, 32);
    }

    #[test]
    fn should_reject_zero_max_hops() {
        let mut config = Config::default();
        config.resolution.max_hops = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(reason)) if reason == "max_hops must be non-zero"
        ));
    }

    #[test]
    fn should_reject_catalog_with_unknown_participant() {
        let toml = r#"
            [[activities]]
            id = "radio"
            participants = ["receiver"]
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
