//! Water-quality averages and in-band indicator percentages.

use crate::settings::QualityThresholds;
use pondstat_common::{fields, mean, percentage, MetricReading};
use serde::{Deserialize, Serialize};

/// Share of readings inside the configured bands, 0–100.
///
/// Each percentage only counts readings that carry the field in question,
/// and is 0 when none do.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIndicators {
    /// pH within `[ph_min, ph_max]`.
    pub ph_in_range_pct: f64,
    /// Dissolved oxygen at or above the minimum.
    pub dissolved_oxygen_adequate_pct: f64,
    /// Temperature within `[temperature_min, temperature_max]`.
    pub temperature_in_range_pct: f64,
}

impl QualityIndicators {
    /// Compute the indicators over a set of water-quality readings.
    pub fn compute(readings: &[MetricReading], thresholds: &QualityThresholds) -> Self {
        Self {
            ph_in_range_pct: share(readings, fields::PH, |v| {
                v >= thresholds.ph_min && v <= thresholds.ph_max
            }),
            dissolved_oxygen_adequate_pct: share(readings, fields::DISSOLVED_OXYGEN, |v| {
                v >= thresholds.dissolved_oxygen_min
            }),
            temperature_in_range_pct: share(readings, fields::TEMPERATURE, |v| {
                v >= thresholds.temperature_min && v <= thresholds.temperature_max
            }),
        }
    }
}

fn share(readings: &[MetricReading], field: &str, in_band: impl Fn(f64) -> bool) -> f64 {
    let (hits, total) = readings
        .iter()
        .filter_map(|r| r.field(field))
        .fold((0_usize, 0_usize), |(hits, total), v| {
            (hits + usize::from(in_band(v)), total + 1)
        });
    percentage(hits as f64, total as f64).unwrap_or(0.0)
}

/// Season-level water-quality section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterQualitySummary {
    /// Number of water-quality readings considered.
    pub reading_count: usize,
    /// Mean pH.
    pub avg_ph: Option<f64>,
    /// Mean dissolved oxygen.
    pub avg_dissolved_oxygen: Option<f64>,
    /// Mean temperature.
    pub avg_temperature: Option<f64>,
    /// Mean salinity.
    pub avg_salinity: Option<f64>,
    /// In-band percentages.
    pub indicators: QualityIndicators,
}

impl WaterQualitySummary {
    /// Whether any reading backs this summary.
    pub const fn has_readings(&self) -> bool {
        self.reading_count > 0
    }
}

/// Summarize water-quality readings; all averages are `None` for an empty input.
pub fn summarize_water_quality(
    readings: &[MetricReading],
    thresholds: &QualityThresholds,
) -> WaterQualitySummary {
    let field_mean = |name: &str| mean(readings.iter().filter_map(|r| r.field(name)));

    WaterQualitySummary {
        reading_count: readings.len(),
        avg_ph: field_mean(fields::PH),
        avg_dissolved_oxygen: field_mean(fields::DISSOLVED_OXYGEN),
        avg_temperature: field_mean(fields::TEMPERATURE),
        avg_salinity: field_mean(fields::SALINITY),
        indicators: QualityIndicators::compute(readings, thresholds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pondstat_common::test_utils::{assert_approx_eq, at, farm_fixtures};

    #[test]
    fn test_indicators_over_mixed_readings() {
        let readings = vec![
            farm_fixtures::water("p1", "s1", at(2023, 6, 1, 8), 7.8, 5.5, 28.0, 15.0),
            farm_fixtures::water("p1", "s1", at(2023, 6, 2, 8), 9.0, 4.0, 33.0, 15.0),
            farm_fixtures::water("p1", "s1", at(2023, 6, 3, 8), 8.5, 5.0, 26.0, 15.0),
            farm_fixtures::ph_reading("p1", "s1", at(2023, 6, 4, 8), 7.0),
        ];

        let indicators = QualityIndicators::compute(&readings, &QualityThresholds::default());

        assert_approx_eq(indicators.ph_in_range_pct, 50.0, 1e-9);
        assert_approx_eq(indicators.dissolved_oxygen_adequate_pct, 200.0 / 3.0, 1e-9);
        assert_approx_eq(indicators.temperature_in_range_pct, 200.0 / 3.0, 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_water_quality(&[], &QualityThresholds::default());

        assert!(!summary.has_readings());
        assert_eq!(summary.avg_ph, None);
        assert_eq!(summary.indicators, QualityIndicators::default());
    }

    #[test]
    fn test_summary_averages() {
        let readings = vec![
            farm_fixtures::water("p1", "s1", at(2023, 6, 1, 8), 7.5, 5.0, 28.0, 14.0),
            farm_fixtures::water("p2", "s1", at(2023, 6, 1, 9), 8.5, 6.0, 30.0, 16.0),
        ];
        let summary = summarize_water_quality(&readings, &QualityThresholds::default());

        assert_eq!(summary.reading_count, 2);
        assert_eq!(summary.avg_ph, Some(8.0));
        assert_eq!(summary.avg_dissolved_oxygen, Some(5.5));
        assert_eq!(summary.avg_temperature, Some(29.0));
        assert_eq!(summary.avg_salinity, Some(15.0));
        assert_approx_eq(summary.indicators.ph_in_range_pct, 100.0, 1e-9);
    }
}
