//! Test utilities and shared fixtures for Pondstat.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! the unit and integration tests of the other workspace crates.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{
    fields, HarvestEvent, HarvestEventType, MetricReading, Pond, PondId, PondStatus,
    ReadingKind, Season, SeasonId, SeasonStatus, StockingEvent,
};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Calendar date shorthand.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Naive timestamp shorthand.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, 0, 0)
        .expect("valid fixture time")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Farm record fixtures.
pub mod farm_fixtures {
    use super::*;

    /// An active season with the given id, running 180 days from `start`.
    pub fn season(id: &str, start: NaiveDate) -> Season {
        Season {
            id: SeasonId::from(id),
            name: format!("Season {id}"),
            start_date: start,
            end_date: start + chrono::Duration::days(180),
            status: SeasonStatus::Active,
        }
    }

    /// A pond with the given status and capacity.
    pub fn pond(id: &str, season: &str, status: PondStatus, capacity: f64) -> Pond {
        Pond {
            id: PondId::from(id),
            season_id: SeasonId::from(season),
            name: format!("Pond {id}"),
            size: 1000.0,
            capacity,
            status,
        }
    }

    /// A feed entry.
    pub fn feed(pond: &str, season: &str, timestamp: NaiveDateTime, quantity: f64) -> MetricReading {
        MetricReading::new(
            ReadingKind::Feed,
            PondId::from(pond),
            SeasonId::from(season),
            timestamp,
        )
        .with_field(fields::QUANTITY, quantity)
    }

    /// A water-quality reading with the four core fields.
    pub fn water(
        pond: &str,
        season: &str,
        timestamp: NaiveDateTime,
        ph: f64,
        dissolved_oxygen: f64,
        temperature: f64,
        salinity: f64,
    ) -> MetricReading {
        MetricReading::new(
            ReadingKind::WaterQuality,
            PondId::from(pond),
            SeasonId::from(season),
            timestamp,
        )
        .with_field(fields::PH, ph)
        .with_field(fields::DISSOLVED_OXYGEN, dissolved_oxygen)
        .with_field(fields::TEMPERATURE, temperature)
        .with_field(fields::SALINITY, salinity)
    }

    /// A water-quality reading carrying only pH.
    pub fn ph_reading(pond: &str, season: &str, timestamp: NaiveDateTime, ph: f64) -> MetricReading {
        MetricReading::new(
            ReadingKind::WaterQuality,
            PondId::from(pond),
            SeasonId::from(season),
            timestamp,
        )
        .with_field(fields::PH, ph)
    }

    /// A growth sampling.
    pub fn growth(
        pond: &str,
        season: &str,
        timestamp: NaiveDateTime,
        total_weight: f64,
        total_count: f64,
    ) -> MetricReading {
        MetricReading::new(
            ReadingKind::Growth,
            PondId::from(pond),
            SeasonId::from(season),
            timestamp,
        )
        .with_field(fields::TOTAL_WEIGHT, total_weight)
        .with_field(fields::TOTAL_COUNT, total_count)
    }

    /// A harvest event.
    pub fn harvest(
        pond: &str,
        season: &str,
        timestamp: NaiveDateTime,
        event_type: HarvestEventType,
        harvest_weight: f64,
    ) -> HarvestEvent {
        HarvestEvent {
            pond_id: PondId::from(pond),
            season_id: SeasonId::from(season),
            timestamp,
            event_type,
            harvest_weight,
            average_weight: 20.0,
        }
    }

    /// A stocking event.
    pub fn stocking(pond: &str, season: &str, stocking_date: NaiveDate) -> StockingEvent {
        StockingEvent {
            pond_id: PondId::from(pond),
            season_id: SeasonId::from(season),
            stocking_date,
            stocked_count: Some(100_000),
        }
    }
}

/// Proptest strategies for record collections.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    /// Water-quality pH readings for one pond spread over 2023-01-01 .. 2023-04-10.
    pub fn ph_series(pond: &'static str, max_len: usize) -> impl Strategy<Value = Vec<MetricReading>> {
        prop::collection::vec((0_i64..100, 0_u32..24, 6.0_f64..10.0), 0..max_len).prop_map(
            move |points| {
                points
                    .into_iter()
                    .map(|(offset, hour, ph)| {
                        let day = date(2023, 1, 1) + chrono::Duration::days(offset);
                        let timestamp = day.and_hms_opt(hour, 0, 0).expect("hour below 24");
                        farm_fixtures::ph_reading(pond, "s1", timestamp, ph)
                    })
                    .collect()
            },
        )
    }

    /// Feed quantities and sampled biomass, all non-negative.
    pub fn feed_and_biomass() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (
            prop::collection::vec(0.0_f64..500.0, 0..20),
            prop::collection::vec(0.0_f64..200.0, 0..10),
        )
    }
}
