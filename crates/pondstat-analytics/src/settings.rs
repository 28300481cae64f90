//! Engine settings: trend windows, quality bands and recommendation thresholds.
//!
//! Built from the loaded [`pondstat_config::AnalyticsConfig`], or from
//! [`AnalyticsSettings::default`] when a caller drives the engine directly.

use pondstat_common::PondstatError;
use pondstat_config::{AnalyticsConfig, Config, QualityConfig, RecommendationConfig, TrendConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use pondstat_config::{BucketSize, OriginPolicy, WindowConfig};

/// Lookback range requested for a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Last week.
    Week,
    /// Last month.
    Month,
    /// Last quarter.
    Quarter,
}

impl TimeRange {
    /// All supported ranges.
    pub const ALL: [Self; 3] = [Self::Week, Self::Month, Self::Quarter];

    /// Lowercase identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = PondstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            other => Err(PondstatError::validation_field(
                format!("Unsupported time range '{other}', expected week, month or quarter"),
                "timeRange",
            )),
        }
    }
}

/// Window and bucket size for each [`TimeRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindows {
    /// Window for [`TimeRange::Week`].
    pub week: WindowConfig,
    /// Window for [`TimeRange::Month`].
    pub month: WindowConfig,
    /// Window for [`TimeRange::Quarter`].
    pub quarter: WindowConfig,
}

impl TrendWindows {
    /// Window configured for `range`.
    pub const fn window(&self, range: TimeRange) -> WindowConfig {
        match range {
            TimeRange::Week => self.week,
            TimeRange::Month => self.month,
            TimeRange::Quarter => self.quarter,
        }
    }
}

impl Default for TrendWindows {
    fn default() -> Self {
        Self::from(&TrendConfig::default())
    }
}

impl From<&TrendConfig> for TrendWindows {
    fn from(config: &TrendConfig) -> Self {
        Self {
            week: config.week,
            month: config.month,
            quarter: config.quarter,
        }
    }
}

/// Bands used for the water-quality indicator percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Lowest in-range pH.
    pub ph_min: f64,
    /// Highest in-range pH.
    pub ph_max: f64,
    /// Lowest adequate dissolved oxygen.
    pub dissolved_oxygen_min: f64,
    /// Lowest in-range temperature.
    pub temperature_min: f64,
    /// Highest in-range temperature.
    pub temperature_max: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self::from(&QualityConfig::default())
    }
}

impl From<&QualityConfig> for QualityThresholds {
    fn from(config: &QualityConfig) -> Self {
        Self {
            ph_min: config.ph_min,
            ph_max: config.ph_max,
            dissolved_oxygen_min: config.dissolved_oxygen_min,
            temperature_min: config.temperature_min,
            temperature_max: config.temperature_max,
        }
    }
}

/// Thresholds at which the recommendation rules fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationThresholds {
    /// pH below this is too acidic.
    pub ph_min: f64,
    /// pH above this is too alkaline.
    pub ph_max: f64,
    /// Dissolved oxygen below this needs aeration.
    pub dissolved_oxygen_min: f64,
    /// FCR above this is inefficient feeding.
    pub fcr_max: f64,
    /// Utilization percentage below this leaves ponds idle.
    pub utilization_min: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self::from(&RecommendationConfig::default())
    }
}

impl From<&RecommendationConfig> for RecommendationThresholds {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            ph_min: config.ph_min,
            ph_max: config.ph_max,
            dissolved_oxygen_min: config.dissolved_oxygen_min,
            fcr_max: config.fcr_max,
            utilization_min: config.utilization_min,
        }
    }
}

/// Everything the engine needs besides the records themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSettings {
    /// Trend windows per range.
    pub trend_windows: TrendWindows,
    /// Water-quality bands.
    pub quality: QualityThresholds,
    /// Recommendation thresholds.
    pub recommendations: RecommendationThresholds,
    /// Day 0 of relative comparisons.
    pub origin_policy: OriginPolicy,
    /// Lookback for absolute comparisons without a date range.
    pub default_lookback_days: u32,
    /// Decimal places for presented ratios.
    pub decimal_places: u32,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&AnalyticsConfig> for AnalyticsSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            trend_windows: TrendWindows::from(&config.trend),
            quality: QualityThresholds::from(&config.quality),
            recommendations: RecommendationThresholds::from(&config.recommendations),
            origin_policy: config.origin_policy,
            default_lookback_days: config.default_lookback_days,
            decimal_places: 2,
        }
    }
}

impl From<&Config> for AnalyticsSettings {
    fn from(config: &Config) -> Self {
        Self {
            decimal_places: config.report.decimal_places,
            ..Self::from(&config.analytics)
        }
    }
}
