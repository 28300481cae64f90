//! Season-level KPI aggregation.

use crate::store::SeasonSnapshot;
use pondstat_common::{fields, mean, percentage, total, MetricReading, PondStatus, SeasonId};
use serde::{Deserialize, Serialize};

/// Totals, averages, ratios and percentages for one season.
///
/// Ratios are kept at full precision; rounding happens when a report is
/// presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    /// Season the KPIs describe.
    pub season_id: SeasonId,
    /// Registered ponds.
    pub total_ponds: usize,
    /// Ponds in culture.
    pub active_ponds: usize,
    /// Fully harvested ponds.
    pub completed_ponds: usize,
    /// Everything else, including unknown statuses.
    pub inactive_ponds: usize,
    /// Summed feed quantity.
    pub total_feed_consumed: f64,
    /// Mean quantity per feed entry.
    pub avg_daily_feed: Option<f64>,
    /// Number of feed entries.
    pub feed_entries: usize,
    /// Summed sampled weight divided by summed sampled count.
    pub avg_shrimp_weight: Option<f64>,
    /// Summed sampled weight.
    pub total_biomass: f64,
    /// Summed sampled count.
    pub total_shrimp_count: f64,
    /// Number of growth samplings.
    pub sampling_count: usize,
    /// Mean pH.
    pub avg_ph: Option<f64>,
    /// Mean dissolved oxygen.
    pub avg_dissolved_oxygen: Option<f64>,
    /// Mean temperature.
    pub avg_temperature: Option<f64>,
    /// Mean salinity.
    pub avg_salinity: Option<f64>,
    /// Number of water-quality readings.
    pub water_readings: usize,
    /// Feed conversion ratio.
    pub average_fcr: Option<f64>,
    /// Share of ponds that are active, 0–100.
    pub pond_utilization: Option<f64>,
    /// Sampled count over total capacity, as a percentage.
    pub survival_rate: Option<f64>,
    /// Summed harvest weight.
    pub total_harvest_weight: f64,
    /// Number of harvests.
    pub harvest_count: usize,
}

/// Reduce a season's records into its KPI set.
///
/// Records tagged with another season are ignored.
pub fn compute_kpis(season_id: &SeasonId, records: &SeasonSnapshot) -> KpiSet {
    let in_season = |r: &&MetricReading| &r.season_id == season_id;

    let ponds: Vec<_> = records
        .ponds
        .iter()
        .filter(|p| &p.season_id == season_id)
        .collect();
    let total_ponds = ponds.len();
    let active_ponds = ponds.iter().filter(|p| p.status == PondStatus::Active).count();
    let completed_ponds = ponds
        .iter()
        .filter(|p| p.status == PondStatus::Completed)
        .count();
    let total_capacity = total(ponds.iter().map(|p| p.capacity).filter(|c| c.is_finite()));

    let quantities: Vec<f64> = records
        .feed
        .iter()
        .filter(in_season)
        .filter_map(|r| r.field(fields::QUANTITY))
        .collect();
    let total_feed_consumed = total(quantities.iter().copied());

    let samplings: Vec<&MetricReading> = records.growth.iter().filter(in_season).collect();
    let total_biomass = total(samplings.iter().filter_map(|r| r.field(fields::TOTAL_WEIGHT)));
    let total_shrimp_count = total(samplings.iter().filter_map(|r| r.field(fields::TOTAL_COUNT)));

    let water: Vec<&MetricReading> = records.water_quality.iter().filter(in_season).collect();
    let water_mean = |name: &str| mean(water.iter().filter_map(|r| r.field(name)));

    let harvests: Vec<_> = records
        .harvests
        .iter()
        .filter(|h| &h.season_id == season_id)
        .collect();

    let survival_rate = if samplings.is_empty() {
        None
    } else {
        percentage(total_shrimp_count, total_capacity)
    };

    KpiSet {
        season_id: season_id.clone(),
        total_ponds,
        active_ponds,
        completed_ponds,
        inactive_ponds: total_ponds - active_ponds - completed_ponds,
        total_feed_consumed,
        avg_daily_feed: mean(quantities.iter().copied()),
        feed_entries: quantities.len(),
        avg_shrimp_weight: (total_shrimp_count > 0.0).then(|| total_biomass / total_shrimp_count),
        total_biomass,
        total_shrimp_count,
        sampling_count: samplings.len(),
        avg_ph: water_mean(fields::PH),
        avg_dissolved_oxygen: water_mean(fields::DISSOLVED_OXYGEN),
        avg_temperature: water_mean(fields::TEMPERATURE),
        avg_salinity: water_mean(fields::SALINITY),
        water_readings: water.len(),
        average_fcr: feed_conversion_ratio(total_feed_consumed, total_biomass),
        pond_utilization: percentage(active_ponds as f64, total_ponds as f64),
        survival_rate,
        total_harvest_weight: total(harvests.iter().map(|h| h.harvest_weight)),
        harvest_count: harvests.len(),
    }
}

/// Feed consumed per unit of biomass produced, `None` without biomass.
pub fn feed_conversion_ratio(feed_consumed: f64, biomass: f64) -> Option<f64> {
    (biomass > 0.0).then(|| feed_consumed / biomass)
}
