//! Configuration System
//!
//! Loads tuning parameters from tuning.toml. Every section is optional and
//! falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use faction_events::Resources;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    /// Resources given to a faction created without explicit ones
    pub starting_resources: Resources,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Turn engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Probability that a faction suffers decay in a turn
    pub decay_chance: f64,
    /// Turns per `run` invocation
    pub default_turns: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            decay_chance: 0.1,
            default_turns: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("world_data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or use defaults if there is no file
    /// there. A file that exists but cannot be read or parsed is an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let chance = self.simulation.decay_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::Invalid(format!(
                "simulation.decay_chance must be within [0, 1], got {}",
                chance
            )));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.simulation.decay_chance, 0.1);
        assert_eq!(config.simulation.default_turns, 1);
        assert_eq!(config.starting_resources, Resources::STARTING);
        assert_eq!(config.store.data_dir, PathBuf::from("world_data"));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [simulation]
            seed = 42

            [starting_resources]
            gold = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.decay_chance, 0.1);
        assert_eq!(config.starting_resources.gold, 250);
        assert_eq!(config.starting_resources.troops, 50);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_rejects_bad_decay_chance() {
        let result = SimConfig::from_toml("[simulation]\ndecay_chance = 1.5\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_and_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tuning.toml");

        assert!(matches!(SimConfig::load(&path), Err(ConfigError::Io { .. })));
        assert_eq!(SimConfig::load_if_present(&path).unwrap(), SimConfig::default());

        fs::write(&path, "[store]\ndata_dir = \"elsewhere\"\n").unwrap();
        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("elsewhere"));
        assert_eq!(SimConfig::load_if_present(&path).unwrap(), config);

        fs::write(&path, "[store\n").unwrap();
        assert!(matches!(SimConfig::load(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            SimConfig::load_if_present(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
