//! Configuration loading and validation for the crowd simulation runner.

use std::fs;
use std::path::Path;
use thiserror::Error;

// Re-export types
pub use self::types::{ArenaConfig, Config, SenderConfig, SerializerType, SimulationConfig, TransportConfig};
mod types;

// Config error handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// Config loader implementation
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads a config file, choosing TOML for `.toml` files and JSON otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let file_content = fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&file_content)
        } else {
            Self::from_json_str(&file_content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let sim = &config.simulation;

        // Validate arena dimensions
        let arena = &sim.arena;
        if !(arena.width.is_finite() && arena.width > 0.0 && arena.height.is_finite() && arena.height > 0.0) {
            return Err(ConfigError::ValidationError(
                "Arena dimensions must be positive".to_string()
            ));
        }
        if !(arena.margin.is_finite() && arena.margin >= 0.0) {
            return Err(ConfigError::ValidationError(
                "Arena margin must be non-negative".to_string()
            ));
        }

        // Validate frame rate
        if sim.frame_rate == 0 {
            return Err(ConfigError::ValidationError(
                "Frame rate must be greater than 0".to_string()
            ));
        }

        // Validate output frequency
        if config.transport.output_frequency == 0 {
            return Err(ConfigError::ValidationError(
                "Output frequency must be greater than 0".to_string()
            ));
        }

        if let SenderConfig::File { output_path } = &config.transport.sender {
            if output_path.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "File sender needs an output path".to_string()
                ));
            }
        }

        Ok(())
    }
}
