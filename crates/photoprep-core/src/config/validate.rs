//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.min_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.min_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension <= self.limits.min_image_dimension {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > limits.min_image_dimension".into(),
            ));
        }
        if self.preview.hot_size == 0 {
            return Err(ConfigError::ValidationError(
                "preview.hot_size must be > 0".into(),
            ));
        }
        if self.preview.cold_size < self.preview.hot_size {
            return Err(ConfigError::ValidationError(
                "preview.cold_size must be >= preview.hot_size".into(),
            ));
        }
        if self.preview.hot_quality == 0 || self.preview.hot_quality > 100 {
            return Err(ConfigError::ValidationError(
                "preview.hot_quality must be between 1 and 100".into(),
            ));
        }
        if self.preview.cold_quality == 0 || self.preview.cold_quality > 100 {
            return Err(ConfigError::ValidationError(
                "preview.cold_quality must be between 1 and 100".into(),
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
    fn test_validate_rejects_zero_hot_size() {
        let mut config = Config::default();
        config.preview.hot_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hot_size"));
    }

    #[test]
    fn test_validate_rejects_cold_below_hot() {
        let mut config = Config::default();
        config.preview.cold_size = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cold_size"));
    }

    #[test]
    fn test_validate_rejects_quality_out_of_range() {
        let mut config = Config::default();
        config.preview.hot_quality = 0;
        assert!(config.validate().is_err());

        config.preview.hot_quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_dimension_bounds() {
        let mut config = Config::default();
        config.limits.max_image_dimension = 50;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_image_dimension"));
    }
}
