//! Configuration schema definitions using serde with validation attributes.

use pondstat_common::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Main configuration structure for Pondstat.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Analytics engine settings.
    #[validate]
    pub analytics: AnalyticsConfig,
    /// Report output settings.
    #[validate]
    pub report: ReportConfig,
    /// Logging settings.
    #[validate]
    pub logging: LoggingSettings,
}

/// Analytics engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Lookback window and bucket size per trend range.
    #[validate]
    pub trend: TrendConfig,
    /// Bands used for the water-quality indicator percentages.
    #[validate]
    pub quality: QualityConfig,
    /// Thresholds at which recommendations fire.
    #[validate]
    pub recommendations: RecommendationConfig,
    /// Day 0 of the relative (cultivation-day) comparison timeline.
    pub origin_policy: OriginPolicy,
    /// Lookback applied to absolute comparisons without an explicit date range.
    #[validate(range(min = 1, max = 3650, message = "Default lookback must be between 1 and 3650 days"))]
    pub default_lookback_days: u32,
}

/// Trend windows for the three supported ranges.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TrendConfig {
    /// `week` range.
    #[validate]
    pub week: WindowConfig,
    /// `month` range.
    #[validate]
    pub month: WindowConfig,
    /// `quarter` range.
    #[validate]
    pub quarter: WindowConfig,
}

/// One lookback window and its bucket granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WindowConfig {
    /// Days looked back from "now".
    #[validate(range(min = 1, max = 3650, message = "Window must be between 1 and 3650 days"))]
    pub days: u32,
    /// Bucket width.
    pub bucket: BucketSize,
}

/// Width of a trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSize {
    /// One calendar day.
    Daily,
    /// One ISO week, keyed by its Monday.
    Weekly,
}

/// Water-quality bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QualityConfig {
    /// Lowest acceptable pH.
    #[validate(range(min = 0.0, max = 14.0, message = "pH bounds must lie within 0 and 14"))]
    pub ph_min: f64,
    /// Highest acceptable pH.
    #[validate(range(min = 0.0, max = 14.0, message = "pH bounds must lie within 0 and 14"))]
    pub ph_max: f64,
    /// Lowest acceptable dissolved oxygen, mg/L.
    #[validate(range(min = 0.0, message = "Dissolved oxygen minimum cannot be negative"))]
    pub dissolved_oxygen_min: f64,
    /// Lowest acceptable temperature, °C.
    pub temperature_min: f64,
    /// Highest acceptable temperature, °C.
    pub temperature_max: f64,
}

/// Recommendation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RecommendationConfig {
    /// pH below this fires the pH rule.
    #[validate(range(min = 0.0, max = 14.0, message = "pH bounds must lie within 0 and 14"))]
    pub ph_min: f64,
    /// pH above this fires the pH rule.
    #[validate(range(min = 0.0, max = 14.0, message = "pH bounds must lie within 0 and 14"))]
    pub ph_max: f64,
    /// Dissolved oxygen below this fires the aeration rule.
    #[validate(range(min = 0.0, message = "Dissolved oxygen minimum cannot be negative"))]
    pub dissolved_oxygen_min: f64,
    /// FCR above this fires the feeding rule.
    #[validate(range(min = 0.0, message = "FCR threshold cannot be negative"))]
    pub fcr_max: f64,
    /// Utilization percentage below this fires the pond rule.
    #[validate(range(min = 0.0, max = 100.0, message = "Utilization threshold must be a percentage"))]
    pub utilization_min: f64,
}

/// Origin of the cultivation-day timeline in relative comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginPolicy {
    /// Day 1 is the first day of the pond's season.
    SeasonStart,
    /// Day 1 is the day the pond was stocked.
    Stocking,
}

impl FromStr for OriginPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "season_start" | "season" => Ok(Self::SeasonStart),
            "stocking" => Ok(Self::Stocking),
            other => Err(format!("unknown origin policy '{other}'")),
        }
    }
}

impl fmt::Display for OriginPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeasonStart => f.write_str("season_start"),
            Self::Stocking => f.write_str("stocking"),
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format used when the caller does not choose one.
    pub format: ReportFormat,
    /// Decimal places for ratios and averages in presented output.
    #[validate(range(max = 6, message = "Decimal places cannot exceed 6"))]
    pub decimal_places: u32,
}

/// Report serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Full nested report as JSON.
    Json,
    /// Summary and recommendations flattened to CSV rows.
    Csv,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,
    /// Output layout
    pub format: LogFormat,
    /// Optional log file path
    pub file: Option<String>,
    /// Whether to log span open/close events
    pub include_spans: bool,
}

impl LoggingSettings {
    /// Converts into the subscriber configuration understood by `pondstat-common`.
    pub fn to_logging_config(&self) -> pondstat_common::LoggingConfig {
        pondstat_common::LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            ..pondstat_common::LoggingConfig::default()
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        crate::validation::validate_bands(self)
    }
}
