//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::engine::constants;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Engine tuning. These are the values that change between titles or
/// rule sets; the scoring and estimation weights stay in the constants
/// table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rounds per half; pistol rounds open each half
    #[serde(default = "default_rounds_per_half")]
    pub rounds_per_half: u32,

    /// Team loadout totals below this are ecos
    #[serde(default = "default_eco_loadout_ceiling")]
    pub eco_loadout_ceiling: u32,

    /// Team loadout totals below this (and at or above the eco ceiling)
    /// are force buys
    #[serde(default = "default_force_loadout_ceiling")]
    pub force_loadout_ceiling: u32,

    /// Assumed match length when a feed reports neither rounds nor scores
    #[serde(default = "default_fallback_match_length")]
    pub fallback_match_length: u32,
}

fn default_rounds_per_half() -> u32 {
    constants::ROUNDS_PER_HALF
}

fn default_eco_loadout_ceiling() -> u32 {
    constants::ECO_LOADOUT_CEILING
}

fn default_force_loadout_ceiling() -> u32 {
    constants::FORCE_LOADOUT_CEILING
}

fn default_fallback_match_length() -> u32 {
    constants::FALLBACK_MATCH_LENGTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rounds_per_half: default_rounds_per_half(),
            eco_loadout_ceiling: default_eco_loadout_ceiling(),
            force_loadout_ceiling: default_force_loadout_ceiling(),
            fallback_match_length: default_fallback_match_length(),
        }
    }
}

impl EngineConfig {
    /// The two pistol round numbers, one per half.
    pub fn pistol_rounds(&self) -> [u32; 2] {
        [1, self.rounds_per_half + 1]
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.rounds_per_half == 0 {
            return Err(ConfigError::ValidationError(
                "Rounds per half must be greater than 0".to_string(),
            ));
        }

        if self.engine.eco_loadout_ceiling >= self.engine.force_loadout_ceiling {
            return Err(ConfigError::ValidationError(
                "Eco loadout ceiling must be below the force loadout ceiling".to_string(),
            ));
        }

        if self.engine.fallback_match_length == 0 {
            return Err(ConfigError::ValidationError(
                "Fallback match length must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine.rounds_per_half, 12);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_engine_config_matches_constants() {
        let engine = EngineConfig::default();

        assert_eq!(engine.rounds_per_half, constants::ROUNDS_PER_HALF);
        assert_eq!(engine.eco_loadout_ceiling, constants::ECO_LOADOUT_CEILING);
        assert_eq!(engine.force_loadout_ceiling, constants::FORCE_LOADOUT_CEILING);
        assert_eq!(engine.fallback_match_length, constants::FALLBACK_MATCH_LENGTH);
    }

    #[test]
    fn test_pistol_rounds() {
        let engine = EngineConfig::default();
        assert_eq!(engine.pistol_rounds(), [1, 13]);

        let short_half = EngineConfig {
            rounds_per_half: 8,
            ..EngineConfig::default()
        };
        assert_eq!(short_half.pistol_rounds(), [1, 9]);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_inverted_loadout_bands() {
        let mut config = AppConfig::default();
        config.engine.eco_loadout_ceiling = 25_000;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.engine.rounds_per_half, parsed.engine.rounds_per_half);
    }

    #[test]
    fn test_engine_config_partial_toml() {
        let parsed: EngineConfig = toml::from_str("rounds_per_half = 15").unwrap();
        assert_eq!(parsed.rounds_per_half, 15);
        assert_eq!(parsed.eco_loadout_ceiling, constants::ECO_LOADOUT_CEILING);
    }
}
