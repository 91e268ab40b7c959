//! Configuration management for darkroom.
//!
//! Configuration is loaded from `darkroom.toml` in the working directory
//! with sensible defaults. All config structs implement `Default`, so a
//! missing file means a fully default pipeline.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for darkroom.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project-relative path layout
    pub paths: PathsConfig,

    /// Derivation settings (sizes, qualities)
    pub derive: DeriveConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location (`./darkroom.toml`).
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// darkroom is a per-project batch tool, so configuration lives next to
    /// the content it manages rather than in a home directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("darkroom.toml")
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.derive.full_max_width, 1600);
        assert_eq!(config.derive.thumb_size, 600);
        assert_eq!(config.limits.max_file_size_mb, 100);
        assert_eq!(config.paths.input_dir, PathBuf::from("incoming"));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[derive]"));
        assert!(toml.contains("full_max_width"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("darkroom.toml");
        std::fs::write(&path, "[derive]\nfull_max_width = 1200\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.derive.full_max_width, 1200);
        // Untouched sections fall back to defaults
        assert_eq!(config.derive.thumb_size, 600);
    }
}
