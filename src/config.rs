//! Configuration for the guard.
//!
//! Loads from a TOML file with full defaults; a missing or malformed file
//! falls back to the built-in values, which match the shipped behavior
//! (threshold 65, 300 ms quiet period, local classifier endpoint).

use crate::relay::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuardConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Scores strictly above this show the banner
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Quiet period before an edited draft is classified
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Classifier endpoint the relay posts drafts to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}

fn default_threshold() -> f64 {
    65.0
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl GuardConfig {
    /// Load configuration from the default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_config_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("intent-guard")
            .join("config.toml")
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: PathBuf) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(&path, contents)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_behavior() {
        let config = GuardConfig::default();
        assert_eq!(config.detection.threshold, 65.0);
        assert_eq!(config.detection.debounce_ms, 300);
        assert_eq!(config.relay.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[detection]
threshold = 80.0

[general]
log_level = "debug"
"#;

        let config: GuardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.detection.threshold, 80.0);
        assert_eq!(config.detection.debounce_ms, 300);
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let config = GuardConfig::load_from_path(path);
        assert_eq!(config.detection.threshold, 65.0);
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = GuardConfig::default();
        config.detection.threshold = 75.0;
        config.save_to_path(path.clone()).unwrap();

        let loaded = GuardConfig::load_from_path(path);
        assert_eq!(loaded.detection.threshold, 75.0);
    }
}
