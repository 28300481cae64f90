//! Validation helpers that go beyond the per-field derive attributes

use crate::schema::Config;
use validator::{ValidationError, ValidationErrors};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a log level, accepting a bare level or an `EnvFilter` directive list
/// whose directives end in a known level (`pondstat_analytics=debug,info`).
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if level.is_empty() {
        return Err(ValidationError::new("empty_log_level"));
    }

    let all_known = level.split(',').all(|directive| {
        let level_part = directive.rsplit('=').next().unwrap_or_default().trim();
        LOG_LEVELS.contains(&level_part.to_ascii_lowercase().as_str())
    });

    if all_known {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Cross-field checks: every lower bound must sit below its upper bound.
pub fn validate_bands(config: &Config) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let quality = &config.analytics.quality;
    let rules = &config.analytics.recommendations;

    if quality.ph_min >= quality.ph_max {
        errors.add("quality.ph_min", inverted("pH band"));
    }
    if quality.temperature_min >= quality.temperature_max {
        errors.add("quality.temperature_min", inverted("temperature band"));
    }
    if rules.ph_min >= rules.ph_max {
        errors.add("recommendations.ph_min", inverted("pH target range"));
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn inverted(what: &str) -> ValidationError {
    let mut error = ValidationError::new("inverted_range");
    error.message = Some(format!("{what} minimum must be below its maximum").into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("info").is_ok());
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("pondstat_analytics=trace,warn").is_ok());

        assert!(validate_log_level("").is_err());
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("pondstat=loud").is_err());
    }

    #[test]
    fn test_default_bands_are_ordered() {
        assert!(validate_bands(&Config::default()).is_ok());
    }

    #[test]
    fn test_inverted_bands_are_rejected() {
        let mut config = Config::default();
        config.analytics.quality.ph_min = 9.0;
        config.analytics.recommendations.ph_max = 7.0;

        let errors = validate_bands(&config).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("quality.ph_min"));
        assert!(fields.contains_key("recommendations.ph_min"));
        assert!(!fields.contains_key("quality.temperature_min"));
    }
}
