//! Default values matching the documented domain constants.

use crate::schema::*;
use pondstat_common::logging::LogFormat;

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trend: TrendConfig::default(),
            quality: QualityConfig::default(),
            recommendations: RecommendationConfig::default(),
            origin_policy: OriginPolicy::SeasonStart,
            default_lookback_days: 30,
        }
    }
}

// Quarter stays daily: ~90 buckets rather than ~13 weekly ones.
impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            week: WindowConfig {
                days: 7,
                bucket: BucketSize::Daily,
            },
            month: WindowConfig {
                days: 30,
                bucket: BucketSize::Daily,
            },
            quarter: WindowConfig {
                days: 90,
                bucket: BucketSize::Daily,
            },
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            days: 30,
            bucket: BucketSize::Daily,
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            ph_min: 7.5,
            ph_max: 8.5,
            dissolved_oxygen_min: 5.0,
            temperature_min: 26.0,
            temperature_max: 32.0,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            ph_min: 7.5,
            ph_max: 8.5,
            dissolved_oxygen_min: 5.0,
            fcr_max: 2.0,
            utilization_min: 80.0,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Json,
            decimal_places: 2,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file: None,
            include_spans: false,
        }
    }
}
