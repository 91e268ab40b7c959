//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.derive.full_max_width == 0 {
            return Err(ConfigError::ValidationError(
                "derive.full_max_width must be > 0".into(),
            ));
        }
        if self.derive.thumb_size == 0 {
            return Err(ConfigError::ValidationError(
                "derive.thumb_size must be > 0".into(),
            ));
        }
        if self.derive.full_quality == 0 || self.derive.full_quality > 100 {
            return Err(ConfigError::ValidationError(
                "derive.full_quality must be between 1 and 100".into(),
            ));
        }
        if self.derive.thumb_quality == 0 || self.derive.thumb_quality > 100 {
            return Err(ConfigError::ValidationError(
                "derive.thumb_quality must be between 1 and 100".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_full_width() {
        let mut config = Config::default();
        config.derive.full_max_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_quality() {
        let mut config = Config::default();
        config.derive.thumb_quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.processing.supported_formats.clear();
        assert!(config.validate().is_err());
    }
}
