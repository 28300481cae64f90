//! Record store abstraction.
//!
//! The engine never talks to a database directly. Adapters implement
//! [`RecordStore`] and hand back normalized records; every analysis then runs
//! over the collections returned, never over live data.

use async_trait::async_trait;
use pondstat_common::{
    DateRange, HarvestEvent, MetricReading, Pond, PondId, ReadingKind, Result, Season, SeasonId,
    StockingEvent,
};
use tracing::debug;

/// Filter applied to record fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// Season the records belong to.
    pub season_id: SeasonId,
    /// Restrict to one pond.
    pub pond_id: Option<PondId>,
    /// Restrict to an inclusive date range.
    pub date_range: Option<DateRange>,
}

impl RecordQuery {
    /// Every record of a season.
    pub const fn season(season_id: SeasonId) -> Self {
        Self {
            season_id,
            pond_id: None,
            date_range: None,
        }
    }

    /// Restrict to one pond.
    #[must_use]
    pub fn for_pond(mut self, pond_id: PondId) -> Self {
        self.pond_id = Some(pond_id);
        self
    }

    /// Restrict to a date range.
    #[must_use]
    pub const fn within(mut self, range: Option<DateRange>) -> Self {
        self.date_range = range;
        self
    }

    /// Whether a record with these coordinates passes the filter.
    pub fn matches(
        &self,
        season_id: &SeasonId,
        pond_id: &PondId,
        timestamp: chrono::NaiveDateTime,
    ) -> bool {
        season_id == &self.season_id
            && self.pond_id.as_ref().map_or(true, |p| p == pond_id)
            && self.date_range.map_or(true, |r| r.contains(timestamp))
    }
}

/// Source of farm records.
///
/// Implementations must return [`pondstat_common::PondstatError::NotFound`]
/// for unknown seasons or ponds and an empty collection when a filter simply
/// matches nothing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one season.
    async fn fetch_season(&self, season_id: &SeasonId) -> Result<Season>;

    /// Fetch one pond, whatever season it belongs to.
    async fn fetch_pond(&self, pond_id: &PondId) -> Result<Pond>;

    /// Fetch every pond of a season.
    async fn fetch_ponds(&self, season_id: &SeasonId) -> Result<Vec<Pond>>;

    /// Fetch feed entries.
    async fn fetch_feed_inputs(&self, query: &RecordQuery) -> Result<Vec<MetricReading>>;

    /// Fetch water-quality readings.
    async fn fetch_water_quality_inputs(&self, query: &RecordQuery) -> Result<Vec<MetricReading>>;

    /// Fetch growth samplings.
    async fn fetch_growth_samplings(&self, query: &RecordQuery) -> Result<Vec<MetricReading>>;

    /// Fetch harvest events.
    async fn fetch_harvest_events(&self, query: &RecordQuery) -> Result<Vec<HarvestEvent>>;

    /// Fetch stocking events.
    async fn fetch_stocking_events(&self, query: &RecordQuery) -> Result<Vec<StockingEvent>>;

    /// Fetch the readings of one log.
    async fn fetch_readings(
        &self,
        kind: ReadingKind,
        query: &RecordQuery,
    ) -> Result<Vec<MetricReading>> {
        match kind {
            ReadingKind::Feed => self.fetch_feed_inputs(query).await,
            ReadingKind::WaterQuality => self.fetch_water_quality_inputs(query).await,
            ReadingKind::Growth => self.fetch_growth_samplings(query).await,
        }
    }
}

/// Everything recorded for one season, fetched once and analysed as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSnapshot {
    /// The season itself.
    pub season: Season,
    /// Ponds registered for the season.
    pub ponds: Vec<Pond>,
    /// Feed entries.
    pub feed: Vec<MetricReading>,
    /// Water-quality readings.
    pub water_quality: Vec<MetricReading>,
    /// Growth samplings.
    pub growth: Vec<MetricReading>,
    /// Harvests.
    pub harvests: Vec<HarvestEvent>,
}

impl SeasonSnapshot {
    /// Fetch every collection of a season from `store`.
    pub async fn fetch<S: RecordStore + ?Sized>(store: &S, season_id: &SeasonId) -> Result<Self> {
        let season = store.fetch_season(season_id).await?;
        let query = RecordQuery::season(season_id.clone());

        let snapshot = Self {
            ponds: store.fetch_ponds(season_id).await?,
            feed: store.fetch_feed_inputs(&query).await?,
            water_quality: store.fetch_water_quality_inputs(&query).await?,
            growth: store.fetch_growth_samplings(&query).await?,
            harvests: store.fetch_harvest_events(&query).await?,
            season,
        };

        debug!(
            season = %season_id,
            ponds = snapshot.ponds.len(),
            feed = snapshot.feed.len(),
            water_quality = snapshot.water_quality.len(),
            growth = snapshot.growth.len(),
            harvests = snapshot.harvests.len(),
            "Fetched season snapshot"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pondstat_common::test_utils::{at, date};

    #[test]
    fn test_query_matching() {
        let season = SeasonId::from("s1");
        let pond = PondId::from("p1");
        let other = PondId::from("p2");

        let everything = RecordQuery::season(season.clone());
        assert!(everything.matches(&season, &other, at(2020, 1, 1, 0)));
        assert!(!everything.matches(&SeasonId::from("s2"), &pond, at(2020, 1, 1, 0)));

        let narrowed = RecordQuery::season(season.clone())
            .for_pond(pond.clone())
            .within(Some(DateRange::new(date(2023, 6, 1), date(2023, 6, 30))));
        assert!(narrowed.matches(&season, &pond, at(2023, 6, 30, 23)));
        assert!(!narrowed.matches(&season, &pond, at(2023, 7, 1, 0)));
        assert!(!narrowed.matches(&season, &other, at(2023, 6, 15, 0)));
    }
}
