//! In-memory [`RecordStore`] backed by a JSON export of the farm database.
//!
//! Exports are loose: references may be bare ids or populated documents
//! (`{"_id": "...", "name": ...}`), ids may be spelled `_id` or `id`, and
//! record dates may be plain dates, naive timestamps or RFC 3339 strings.
//! Everything is normalized here, once, before any analysis runs.

use crate::store::{RecordQuery, RecordStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pondstat_common::{
    fields, HarvestEvent, HarvestEventType, MetricReading, Pond, PondId, PondStatus,
    PondstatError, ReadingKind, Result, Season, SeasonId, SeasonStatus, StockingEvent,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// A reference that is either a bare id or a populated document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawRef {
    Id(String),
    Populated {
        #[serde(alias = "_id")]
        id: String,
    },
}

impl RawRef {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Populated { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeason {
    #[serde(alias = "_id")]
    id: String,
    name: String,
    start_date: String,
    end_date: String,
    status: SeasonStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPond {
    #[serde(alias = "_id")]
    id: String,
    season_id: RawRef,
    name: String,
    #[serde(default)]
    size: f64,
    #[serde(default)]
    capacity: f64,
    status: PondStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReading {
    pond_id: RawRef,
    season_id: RawRef,
    #[serde(alias = "date")]
    timestamp: String,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHarvest {
    pond_id: RawRef,
    season_id: RawRef,
    #[serde(alias = "date")]
    timestamp: String,
    event_type: HarvestEventType,
    #[serde(default)]
    harvest_weight: f64,
    #[serde(default)]
    average_weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStocking {
    pond_id: RawRef,
    season_id: RawRef,
    stocking_date: String,
    #[serde(default)]
    stocked_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSnapshot {
    seasons: Vec<RawSeason>,
    ponds: Vec<RawPond>,
    feed_inputs: Vec<RawReading>,
    water_quality_inputs: Vec<RawReading>,
    growth_samplings: Vec<RawReading>,
    harvest_events: Vec<RawHarvest>,
    stocking_events: Vec<RawStocking>,
}

/// Parse a record timestamp, keeping the recorded wall-clock time.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|e| PondstatError::store_with_source(format!("Invalid timestamp '{raw}'"), e))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    parse_timestamp(raw).map(|ts| ts.date())
}

impl RawReading {
    fn normalize(self, kind: ReadingKind) -> Result<MetricReading> {
        let mut reading = MetricReading::new(
            kind,
            PondId(self.pond_id.into_id()),
            SeasonId(self.season_id.into_id()),
            parse_timestamp(&self.timestamp)?,
        );

        for (name, value) in self.rest {
            match value {
                Value::Number(n) => {
                    if let Some(v) = n.as_f64() {
                        reading.fields.insert(name, v);
                    }
                }
                Value::String(s) if name == "feedType" || name == "category" => {
                    reading.category = Some(s);
                }
                _ => {}
            }
        }

        // Feed exports sometimes name the quantity "amount".
        if kind == ReadingKind::Feed && !reading.fields.contains_key(fields::QUANTITY) {
            if let Some(amount) = reading.fields.remove("amount") {
                reading.fields.insert(fields::QUANTITY.to_string(), amount);
            }
        }

        Ok(reading)
    }
}

/// Normalized records held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotStore {
    seasons: Vec<Season>,
    ponds: Vec<Pond>,
    feed: Vec<MetricReading>,
    water_quality: Vec<MetricReading>,
    growth: Vec<MetricReading>,
    harvests: Vec<HarvestEvent>,
    stockings: Vec<StockingEvent>,
}

fn normalize_readings(raw: Vec<RawReading>, kind: ReadingKind) -> Vec<MetricReading> {
    raw.into_iter()
        .filter_map(|r| match r.normalize(kind) {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!(kind = ?kind, error = %e, "Skipping unreadable record");
                None
            }
        })
        .collect()
}

impl SnapshotStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON export.
    ///
    /// Malformed seasons are an error; individual readings, harvests or
    /// stockings with unparseable dates are skipped with a warning.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;

        let seasons = raw
            .seasons
            .into_iter()
            .map(|s| {
                Ok(Season {
                    id: SeasonId(s.id),
                    name: s.name,
                    start_date: parse_date(&s.start_date)?,
                    end_date: parse_date(&s.end_date)?,
                    status: s.status,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ponds = raw
            .ponds
            .into_iter()
            .map(|p| Pond {
                id: PondId(p.id),
                season_id: SeasonId(p.season_id.into_id()),
                name: p.name,
                size: p.size,
                capacity: p.capacity,
                status: p.status,
            })
            .collect();

        let harvests = raw
            .harvest_events
            .into_iter()
            .filter_map(|h| match parse_timestamp(&h.timestamp) {
                Ok(timestamp) => Some(HarvestEvent {
                    pond_id: PondId(h.pond_id.into_id()),
                    season_id: SeasonId(h.season_id.into_id()),
                    timestamp,
                    event_type: h.event_type,
                    harvest_weight: h.harvest_weight,
                    average_weight: h.average_weight,
                }),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable harvest event");
                    None
                }
            })
            .collect();

        let stockings = raw
            .stocking_events
            .into_iter()
            .filter_map(|s| match parse_date(&s.stocking_date) {
                Ok(stocking_date) => Some(StockingEvent {
                    pond_id: PondId(s.pond_id.into_id()),
                    season_id: SeasonId(s.season_id.into_id()),
                    stocking_date,
                    stocked_count: s.stocked_count,
                }),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable stocking event");
                    None
                }
            })
            .collect();

        let store = Self {
            seasons,
            ponds,
            feed: normalize_readings(raw.feed_inputs, ReadingKind::Feed),
            water_quality: normalize_readings(raw.water_quality_inputs, ReadingKind::WaterQuality),
            growth: normalize_readings(raw.growth_samplings, ReadingKind::Growth),
            harvests,
            stockings,
        };

        debug!(
            seasons = store.seasons.len(),
            ponds = store.ponds.len(),
            feed = store.feed.len(),
            water_quality = store.water_quality.len(),
            growth = store.growth.len(),
            "Parsed record snapshot"
        );

        Ok(store)
    }

    /// Read and parse a JSON export from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!(path = %path.as_ref().display(), "Loading record snapshot");
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Add a season.
    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.seasons.push(season);
        self
    }

    /// Add ponds.
    #[must_use]
    pub fn with_ponds(mut self, ponds: impl IntoIterator<Item = Pond>) -> Self {
        self.ponds.extend(ponds);
        self
    }

    /// Add readings, routed by their kind.
    #[must_use]
    pub fn with_readings(mut self, readings: impl IntoIterator<Item = MetricReading>) -> Self {
        for reading in readings {
            match reading.kind {
                ReadingKind::Feed => self.feed.push(reading),
                ReadingKind::WaterQuality => self.water_quality.push(reading),
                ReadingKind::Growth => self.growth.push(reading),
            }
        }
        self
    }

    /// Add harvests.
    #[must_use]
    pub fn with_harvests(mut self, harvests: impl IntoIterator<Item = HarvestEvent>) -> Self {
        self.harvests.extend(harvests);
        self
    }

    /// Add stockings.
    #[must_use]
    pub fn with_stockings(mut self, stockings: impl IntoIterator<Item = StockingEvent>) -> Self {
        self.stockings.extend(stockings);
        self
    }

    fn season_exists(&self, season_id: &SeasonId) -> Result<()> {
        if self.seasons.iter().any(|s| &s.id == season_id) {
            Ok(())
        } else {
            Err(PondstatError::not_found("Season", season_id))
        }
    }

    fn select(&self, readings: &[MetricReading], query: &RecordQuery) -> Result<Vec<MetricReading>> {
        self.season_exists(&query.season_id)?;
        Ok(readings
            .iter()
            .filter(|r| query.matches(&r.season_id, &r.pond_id, r.timestamp))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordStore for SnapshotStore {
    async fn fetch_season(&self, season_id: &SeasonId) -> Result<Season> {
        self.seasons
            .iter()
            .find(|s| &s.id == season_id)
            .cloned()
            .ok_or_else(|| PondstatError::not_found("Season", season_id))
    }

    async fn fetch_pond(&self, pond_id: &PondId) -> Result<Pond> {
        self.ponds
            .iter()
            .find(|p| &p.id == pond_id)
            .cloned()
            .ok_or_else(|| PondstatError::not_found("Pond", pond_id))
    }

    async fn fetch_ponds(&self, season_id: &SeasonId) -> Result<Vec<Pond>> {
        self.season_exists(season_id)?;
        Ok(self
            .ponds
            .iter()
            .filter(|p| &p.season_id == season_id)
            .cloned()
            .collect())
    }

    async fn fetch_feed_inputs(&self, query: &RecordQuery) -> Result<Vec<MetricReading>> {
        self.select(&self.feed, query)
    }

    async fn fetch_water_quality_inputs(&self, query: &RecordQuery) -> Result<Vec<MetricReading>> {
        self.select(&self.water_quality, query)
    }

    async fn fetch_growth_samplings(&self, query: &RecordQuery) -> Result<Vec<MetricReading>> {
        self.select(&self.growth, query)
    }

    async fn fetch_harvest_events(&self, query: &RecordQuery) -> Result<Vec<HarvestEvent>> {
        self.season_exists(&query.season_id)?;
        Ok(self
            .harvests
            .iter()
            .filter(|h| query.matches(&h.season_id, &h.pond_id, h.timestamp))
            .cloned()
            .collect())
    }

    async fn fetch_stocking_events(&self, query: &RecordQuery) -> Result<Vec<StockingEvent>> {
        self.season_exists(&query.season_id)?;
        Ok(self
            .stockings
            .iter()
            .filter(|s| {
                let at = s.stocking_date.and_time(chrono::NaiveTime::MIN);
                query.matches(&s.season_id, &s.pond_id, at)
            })
            .cloned()
            .collect())
    }
}
