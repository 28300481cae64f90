//! Configuration loading utilities

use crate::schema::{Config, OriginPolicy, ReportFormat};
use pondstat_common::Result as PondstatResult;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "PONDSTAT_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },
}

impl From<ConfigError> for pondstat_common::PondstatError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!(path = %path.as_ref().display(), "Reading configuration file");
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::load_from_str(&content)
    }

    /// Parse YAML content, apply environment overrides and validate
    pub fn load_from_str(content: &str) -> Result<Config, ConfigError> {
        let mut config: Config = serde_yaml::from_str(content)?;
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from `PONDSTAT_CONFIG_PATH`, `pondstat.yaml`,
    /// `pondstat.yml`, or defaults, in that order
    pub fn load() -> PondstatResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_config(&config_path)?
        } else if Path::new("pondstat.yaml").exists() {
            Self::load_config("pondstat.yaml")?
        } else if Path::new("pondstat.yml").exists() {
            Self::load_config("pondstat.yml")?
        } else {
            info!("No configuration file found, using defaults");
            Self::defaults_with_env()?
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PondstatResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Defaults with environment overrides applied
    pub fn defaults_with_env() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(level) = env::var("PONDSTAT_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("PONDSTAT_LOG_FILE") {
            config.logging.file = Some(file).filter(|f| !f.is_empty());
        }

        if let Ok(policy) = env::var("PONDSTAT_ORIGIN_POLICY") {
            config.analytics.origin_policy =
                policy
                    .parse::<OriginPolicy>()
                    .map_err(|message| ConfigError::EnvParseError {
                        var: "PONDSTAT_ORIGIN_POLICY".to_string(),
                        message,
                    })?;
        }

        if let Ok(days) = env::var("PONDSTAT_DEFAULT_LOOKBACK_DAYS") {
            config.analytics.default_lookback_days =
                days.parse().map_err(|e: std::num::ParseIntError| ConfigError::EnvParseError {
                    var: "PONDSTAT_DEFAULT_LOOKBACK_DAYS".to_string(),
                    message: e.to_string(),
                })?;
        }

        if let Ok(format) = env::var("PONDSTAT_REPORT_FORMAT") {
            config.report.format =
                format
                    .parse::<ReportFormat>()
                    .map_err(|message| ConfigError::EnvParseError {
                        var: "PONDSTAT_REPORT_FORMAT".to_string(),
                        message,
                    })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BucketSize;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r"
analytics:
  origin_policy: stocking
  trend:
    quarter:
      days: 90
      bucket: weekly
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.analytics.origin_policy, OriginPolicy::Stocking);
        assert_eq!(config.analytics.trend.quarter.bucket, BucketSize::Weekly);
        assert_eq!(config.analytics.trend.week.days, 7);
        assert_eq!(config.analytics.recommendations.fcr_max, 2.0);
        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_out_of_range_values_fail_validation() {
        let yaml = r"
analytics:
  default_lookback_days: 0
report:
  decimal_places: 9
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_config_error_converts_to_pondstat_error() {
        let err = ConfigError::EnvParseError {
            var: "PONDSTAT_REPORT_FORMAT".to_string(),
            message: "unknown report format 'xml'".to_string(),
        };
        let converted: pondstat_common::PondstatError = err.into();
        assert!(converted.to_string().contains("Configuration error"));
    }
}
