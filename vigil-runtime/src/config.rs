//! Runtime configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) yields a working console.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use vigil_modules::DEFAULT_SEARCH_LATENCY;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Simulated search latency in milliseconds
    pub search_latency_ms: u64,
    /// Runtime tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Directory receiving JSON exports
    pub export_dir: PathBuf,
    /// Start with the seed alerts and targets
    pub seed: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            search_latency_ms: DEFAULT_SEARCH_LATENCY.as_millis() as u64,
            tick_interval_ms: 1000,
            export_dir: PathBuf::from("."),
            seed: true,
        }
    }
}

impl ConsoleConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded config from {}", path.as_ref().display());
        Self::from_toml_str(&raw)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(Self::default()),
        }
    }

    pub fn with_export_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_search_latency(mut self, latency: Duration) -> Self {
        self.search_latency_ms = latency.as_millis() as u64;
        self
    }

    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    pub fn search_latency(&self) -> Duration {
        Duration::from_millis(self.search_latency_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.search_latency(), Duration::from_millis(2000));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert!(config.seed);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ConsoleConfig::from_toml_str("search_latency_ms = 10\nexport_dir = \"out\"").unwrap();
        assert_eq!(config.search_latency_ms, 10);
        assert_eq!(config.export_dir, PathBuf::from("out"));
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.seed);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ConsoleConfig::from_toml_str("").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        assert!(matches!(
            ConsoleConfig::from_toml_str("seed = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(ConsoleConfig::load_or_default(Some(Path::new("/nonexistent/vigil.toml"))).is_err());
    }

    #[test]
    fn test_builders() {
        let config = ConsoleConfig::default()
            .with_export_dir("exports")
            .with_search_latency(Duration::ZERO)
            .with_seed(false);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.search_latency_ms, 0);
        assert!(!config.seed);
    }
}
