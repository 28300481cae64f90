//! Catalog of comparable metrics.

use pondstat_common::{fields, MetricReading, PondstatError, ReadingKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A metric that can be charted and compared between ponds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    /// Water pH.
    Ph,
    /// Dissolved oxygen, mg/L.
    DissolvedOxygen,
    /// Water temperature, °C.
    Temperature,
    /// Salinity, ppt.
    Salinity,
    /// Total ammonia nitrogen, mg/L.
    Ammonia,
    /// Feed dispensed per entry.
    FeedQuantity,
    /// Mean body weight of a growth sampling.
    AverageWeight,
}

impl Metric {
    /// Every metric in the catalog.
    pub const ALL: [Self; 7] = [
        Self::Ph,
        Self::DissolvedOxygen,
        Self::Temperature,
        Self::Salinity,
        Self::Ammonia,
        Self::FeedQuantity,
        Self::AverageWeight,
    ];

    /// Identifier used in requests and result maps.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Ph => fields::PH,
            Self::DissolvedOxygen => fields::DISSOLVED_OXYGEN,
            Self::Temperature => fields::TEMPERATURE,
            Self::Salinity => fields::SALINITY,
            Self::Ammonia => fields::AMMONIA,
            Self::FeedQuantity => "feedQuantity",
            Self::AverageWeight => "averageWeight",
        }
    }

    /// Log the metric is read from.
    pub const fn kind(&self) -> ReadingKind {
        match self {
            Self::FeedQuantity => ReadingKind::Feed,
            Self::AverageWeight => ReadingKind::Growth,
            _ => ReadingKind::WaterQuality,
        }
    }

    /// Value of this metric carried by `reading`, if any.
    pub fn value(&self, reading: &MetricReading) -> Option<f64> {
        if reading.kind != self.kind() {
            return None;
        }
        match self {
            Self::FeedQuantity => reading.field(fields::QUANTITY),
            Self::AverageWeight => {
                let weight = reading.field(fields::TOTAL_WEIGHT)?;
                let count = reading.field(fields::TOTAL_COUNT).filter(|c| *c > 0.0)?;
                Some(weight / count)
            }
            _ => reading.field(self.id()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Metric {
    type Err = PondstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                PondstatError::validation_field(format!("Unknown metric '{wanted}'"), "metrics")
            })
    }
}

impl TryFrom<String> for Metric {
    type Error = PondstatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Metric> for String {
    fn from(value: Metric) -> Self {
        value.id().to_string()
    }
}
