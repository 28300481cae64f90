//! Record types supplied by the record store and newtype identifiers.
//!
//! These are the normalized shapes the analytics engine consumes. Whatever
//! loose document shape the store holds is converted into these structs at
//! the adapter boundary.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Names of the numeric fields carried by [`MetricReading`]s.
pub mod fields {
    // ── Feed ────────────────────────────────────────────────────────────────
    /// Feed mass dispensed in one entry.
    pub const QUANTITY: &str = "quantity";

    // ── Water quality ───────────────────────────────────────────────────────
    /// Acidity.
    pub const PH: &str = "pH";
    /// Dissolved oxygen, mg/L.
    pub const DISSOLVED_OXYGEN: &str = "dissolvedOxygen";
    /// Water temperature, °C.
    pub const TEMPERATURE: &str = "temperature";
    /// Salinity, ppt.
    pub const SALINITY: &str = "salinity";
    /// Total ammonia nitrogen, mg/L.
    pub const AMMONIA: &str = "ammonia";

    // ── Growth sampling ─────────────────────────────────────────────────────
    /// Combined weight of the sampled animals.
    pub const TOTAL_WEIGHT: &str = "totalWeight";
    /// Number of sampled animals.
    pub const TOTAL_COUNT: &str = "totalCount";

    /// Water-quality fields that always appear in summaries, even when empty.
    pub const WATER_QUALITY: [&str; 4] = [PH, DISSOLVED_OXYGEN, TEMPERATURE, SALINITY];
}

/// Identifier of a culture season.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonId(pub String);

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeasonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a pond.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PondId(pub String);

impl fmt::Display for PondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PondId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new range; callers are expected to pass `start <= end`.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether the calendar day of `timestamp` falls inside the range.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let date = timestamp.date();
        date >= self.start && date <= self.end
    }
}

/// Lifecycle state of a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    /// Created but not started.
    Planning,
    /// Ponds are being cultured.
    Active,
    /// Season closed.
    Completed,
}

/// A culture season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    /// Season identifier.
    pub id: SeasonId,
    /// Display name.
    pub name: String,
    /// First day of the season.
    pub start_date: NaiveDate,
    /// Last day of the season.
    pub end_date: NaiveDate,
    /// Lifecycle state.
    pub status: SeasonStatus,
}

/// Operating state of a pond.
///
/// Statuses the engine does not know deserialize as [`PondStatus::Inactive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PondStatus {
    /// Stocked and in culture.
    Active,
    /// Fully harvested.
    Completed,
    /// Idle, under maintenance, or unknown.
    Inactive,
}

impl From<String> for PondStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Inactive,
        }
    }
}

impl From<PondStatus> for String {
    fn from(value: PondStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PondStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Inactive => "Inactive",
        };
        f.write_str(name)
    }
}

/// A pond registered for a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pond {
    /// Pond identifier.
    pub id: PondId,
    /// Season the pond belongs to.
    pub season_id: SeasonId,
    /// Display name.
    pub name: String,
    /// Surface area.
    pub size: f64,
    /// Stocking capacity in animals.
    pub capacity: f64,
    /// Operating state.
    pub status: PondStatus,
}

/// Which operational log a reading comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingKind {
    /// Feed entry.
    Feed,
    /// Water-quality measurement.
    WaterQuality,
    /// Growth sampling.
    Growth,
}

/// A timestamped record with one or more named numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricReading {
    /// Pond the reading was taken in.
    pub pond_id: PondId,
    /// Season the reading belongs to.
    pub season_id: SeasonId,
    /// Local, timezone-naive time of the reading.
    pub timestamp: NaiveDateTime,
    /// Source log.
    pub kind: ReadingKind,
    /// Numeric fields keyed by the names in [`fields`].
    pub fields: BTreeMap<String, f64>,
    /// Free-form category, e.g. the feed type of a feed entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MetricReading {
    /// Create a reading with no fields yet.
    pub fn new(
        kind: ReadingKind,
        pond_id: PondId,
        season_id: SeasonId,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            pond_id,
            season_id,
            timestamp,
            kind,
            fields: BTreeMap::new(),
            category: None,
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Builder-style category setter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Value of a field, ignoring NaN and infinities.
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied().filter(|v| v.is_finite())
    }
}

/// Kind of harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HarvestEventType {
    /// Part of the stock removed; culture continues.
    PartialHarvest,
    /// Pond emptied.
    FullHarvest,
}

/// A harvest of a pond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestEvent {
    /// Harvested pond.
    pub pond_id: PondId,
    /// Season of the harvest.
    pub season_id: SeasonId,
    /// Time of the harvest.
    pub timestamp: NaiveDateTime,
    /// Partial or full.
    pub event_type: HarvestEventType,
    /// Harvested mass.
    pub harvest_weight: f64,
    /// Mean body weight at harvest.
    pub average_weight: f64,
}

/// Stocking of a pond, the natural day 0 of its culture cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockingEvent {
    /// Stocked pond.
    pub pond_id: PondId,
    /// Season of the stocking.
    pub season_id: SeasonId,
    /// Day the post-larvae were stocked.
    pub stocking_date: NaiveDate,
    /// Number of animals stocked, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stocked_count: Option<u64>,
}
