//! Per-pond and per-category breakdowns used by the report's analysis sections.

use crate::kpi::feed_conversion_ratio;
use crate::metric::Metric;
use crate::store::SeasonSnapshot;
use pondstat_common::{fields, total, HarvestEvent, HarvestEventType, MetricReading, PondId, PondStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category used for feed entries without a feed type.
pub const UNSPECIFIED_CATEGORY: &str = "Unspecified";

/// Feed total for one pond or category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTotal {
    /// Pond id or feed category.
    pub key: String,
    /// Summed quantity.
    pub total_quantity: f64,
    /// Number of entries.
    pub entries: usize,
}

/// Feed section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedBreakdown {
    /// Summed quantity over the season.
    pub total_quantity: f64,
    /// Number of entries.
    pub entry_count: usize,
    /// Totals per pond, ordered by pond id.
    pub by_pond: Vec<FeedTotal>,
    /// Totals per feed category, ordered by name.
    pub by_category: Vec<FeedTotal>,
}

/// Growth of one pond over its samplings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PondGrowth {
    /// Pond.
    pub pond_id: PondId,
    /// Samplings taken.
    pub samplings: usize,
    /// Average weight at the first sampling.
    pub first_average_weight: Option<f64>,
    /// Average weight at the latest sampling.
    pub latest_average_weight: Option<f64>,
    /// Weight gained per day between first and latest sampling.
    pub average_daily_growth: Option<f64>,
}

/// Growth section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthSummary {
    /// Samplings taken.
    pub sampling_count: usize,
    /// Summed sampled weight.
    pub total_biomass: f64,
    /// Summed sampled weight over summed sampled count.
    pub average_weight: Option<f64>,
    /// Per-pond growth, ordered by pond id.
    pub ponds: Vec<PondGrowth>,
}

/// Harvest total for one pond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PondHarvest {
    /// Pond.
    pub pond_id: PondId,
    /// Harvests recorded.
    pub events: usize,
    /// Summed harvest weight.
    pub harvested_weight: f64,
}

/// Harvest events section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBreakdown {
    /// Partial harvests.
    pub partial_harvests: usize,
    /// Full harvests.
    pub full_harvests: usize,
    /// Summed harvest weight.
    pub total_harvest_weight: f64,
    /// Mean weight per harvest.
    pub average_harvest_weight: Option<f64>,
    /// Per-pond totals, ordered by pond id.
    pub by_pond: Vec<PondHarvest>,
}

/// One row of the pond performance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PondDetail {
    /// Pond.
    pub pond_id: PondId,
    /// Display name.
    pub name: String,
    /// Operating state.
    pub status: PondStatus,
    /// Surface area.
    pub size: f64,
    /// Stocking capacity.
    pub capacity: f64,
    /// Feed dispensed to this pond.
    pub feed_consumed: f64,
    /// Growth samplings taken.
    pub sampling_count: usize,
    /// Biomass sampled in this pond.
    pub sampled_biomass: f64,
    /// Feed conversion ratio of this pond.
    pub fcr: Option<f64>,
    /// Average weight at the latest sampling.
    pub latest_average_weight: Option<f64>,
    /// Summed harvest weight.
    pub harvested_weight: f64,
}

fn feed_totals<'a>(entries: impl Iterator<Item = (String, &'a MetricReading)>) -> Vec<FeedTotal> {
    let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (key, reading) in entries {
        let slot = totals.entry(key).or_insert((0.0, 0));
        slot.0 += reading.field(fields::QUANTITY).unwrap_or(0.0);
        slot.1 += 1;
    }
    totals
        .into_iter()
        .map(|(key, (total_quantity, entries))| FeedTotal {
            key,
            total_quantity,
            entries,
        })
        .collect()
}

fn in_season<'a>(snapshot: &'a SeasonSnapshot, readings: &'a [MetricReading]) -> Vec<&'a MetricReading> {
    readings
        .iter()
        .filter(|r| r.season_id == snapshot.season.id)
        .collect()
}

fn harvests_in_season(snapshot: &SeasonSnapshot) -> Vec<&HarvestEvent> {
    snapshot
        .harvests
        .iter()
        .filter(|h| h.season_id == snapshot.season.id)
        .collect()
}

/// Feed totals per pond and per category.
///
/// Like the KPIs, only records tagged with the snapshot's season count.
pub fn feed_breakdown(snapshot: &SeasonSnapshot) -> FeedBreakdown {
    let feed = in_season(snapshot, &snapshot.feed);

    FeedBreakdown {
        total_quantity: total(feed.iter().filter_map(|r| r.field(fields::QUANTITY))),
        entry_count: feed.len(),
        by_pond: feed_totals(feed.iter().map(|r| (r.pond_id.to_string(), *r))),
        by_category: feed_totals(feed.iter().map(|r| {
            let category = r
                .category
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_CATEGORY.to_string());
            (category, *r)
        })),
    }
}

fn samplings_by_pond<'a>(growth: &[&'a MetricReading]) -> BTreeMap<&'a PondId, Vec<&'a MetricReading>> {
    let mut by_pond: BTreeMap<&PondId, Vec<&MetricReading>> = BTreeMap::new();
    for &reading in growth {
        by_pond.entry(&reading.pond_id).or_default().push(reading);
    }
    for samplings in by_pond.values_mut() {
        samplings.sort_by_key(|r| r.timestamp);
    }
    by_pond
}

fn pond_growth(pond_id: &PondId, samplings: &[&MetricReading]) -> PondGrowth {
    let weighed: Vec<_> = samplings
        .iter()
        .filter_map(|r| Metric::AverageWeight.value(r).map(|w| (r.timestamp, w)))
        .collect();
    let first = weighed.first().copied();
    let latest = weighed.last().copied();

    let average_daily_growth = first.zip(latest).and_then(|((t0, w0), (t1, w1))| {
        let days = (t1.date() - t0.date()).num_days();
        (days > 0).then(|| (w1 - w0) / days as f64)
    });

    PondGrowth {
        pond_id: pond_id.clone(),
        samplings: samplings.len(),
        first_average_weight: first.map(|(_, w)| w),
        latest_average_weight: latest.map(|(_, w)| w),
        average_daily_growth,
    }
}

/// Season growth totals and per-pond growth rates.
pub fn growth_summary(snapshot: &SeasonSnapshot) -> GrowthSummary {
    let growth = in_season(snapshot, &snapshot.growth);
    let total_biomass = total(growth.iter().filter_map(|r| r.field(fields::TOTAL_WEIGHT)));
    let total_count = total(growth.iter().filter_map(|r| r.field(fields::TOTAL_COUNT)));

    GrowthSummary {
        sampling_count: growth.len(),
        total_biomass,
        average_weight: (total_count > 0.0).then(|| total_biomass / total_count),
        ponds: samplings_by_pond(&growth)
            .into_iter()
            .map(|(pond_id, samplings)| pond_growth(pond_id, &samplings))
            .collect(),
    }
}

/// Harvest counts and weights.
pub fn event_breakdown(snapshot: &SeasonSnapshot) -> EventBreakdown {
    let harvests = harvests_in_season(snapshot);
    let total_harvest_weight = total(harvests.iter().map(|h| h.harvest_weight));

    let mut by_pond: BTreeMap<&PondId, (usize, f64)> = BTreeMap::new();
    for harvest in &harvests {
        let slot = by_pond.entry(&harvest.pond_id).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += harvest.harvest_weight;
    }

    EventBreakdown {
        partial_harvests: harvests
            .iter()
            .filter(|h| h.event_type == HarvestEventType::PartialHarvest)
            .count(),
        full_harvests: harvests
            .iter()
            .filter(|h| h.event_type == HarvestEventType::FullHarvest)
            .count(),
        total_harvest_weight,
        average_harvest_weight: (!harvests.is_empty())
            .then(|| total_harvest_weight / harvests.len() as f64),
        by_pond: by_pond
            .into_iter()
            .map(|(pond_id, (events, harvested_weight))| PondHarvest {
                pond_id: pond_id.clone(),
                events,
                harvested_weight,
            })
            .collect(),
    }
}

/// Pond performance table, in the order the ponds were registered.
pub fn pond_details(snapshot: &SeasonSnapshot) -> Vec<PondDetail> {
    let feed = in_season(snapshot, &snapshot.feed);
    let samplings = in_season(snapshot, &snapshot.growth);
    let growth = samplings_by_pond(&samplings);
    let harvests = harvests_in_season(snapshot);

    snapshot
        .ponds
        .iter()
        .filter(|pond| pond.season_id == snapshot.season.id)
        .map(|pond| {
            let feed_consumed = total(
                feed.iter()
                    .filter(|r| r.pond_id == pond.id)
                    .filter_map(|r| r.field(fields::QUANTITY)),
            );
            let samplings = growth.get(&pond.id).map(Vec::as_slice).unwrap_or_default();
            let sampled_biomass = total(samplings.iter().filter_map(|r| r.field(fields::TOTAL_WEIGHT)));

            PondDetail {
                pond_id: pond.id.clone(),
                name: pond.name.clone(),
                status: pond.status,
                size: pond.size,
                capacity: pond.capacity,
                feed_consumed,
                sampling_count: samplings.len(),
                sampled_biomass,
                fcr: feed_conversion_ratio(feed_consumed, sampled_biomass),
                latest_average_weight: pond_growth(&pond.id, samplings).latest_average_weight,
                harvested_weight: total(
                    harvests
                        .iter()
                        .filter(|h| h.pond_id == pond.id)
                        .map(|h| h.harvest_weight),
                ),
            }
        })
        .collect()
}
