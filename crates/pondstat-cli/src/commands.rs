//! Subcommand execution.

use crate::cli::{Args, Command};
use crate::error::{CliError, CliResult};
use chrono::{Local, NaiveDateTime, Utc};
use pondstat_analytics::snapshot::parse_timestamp;
use pondstat_analytics::{AnalyticsSettings, ComparisonRequest, FarmAnalytics, SnapshotStore};
use pondstat_common::{DateRange, PondId, SeasonId};
use pondstat_config::Config;
use serde::Serialize;
use tracing::{debug, info};

fn reference_time(now: Option<&str>) -> CliResult<NaiveDateTime> {
    now.map_or_else(
        || Ok(Local::now().naive_local()),
        |raw| parse_timestamp(raw).map_err(|e| CliError::Usage(format!("--now: {e}"))),
    )
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Run the selected subcommand and return its rendered output.
pub async fn run(args: &Args, config: &Config) -> CliResult<String> {
    let store = SnapshotStore::from_path(&args.snapshot)?;
    let analytics = FarmAnalytics::new(store, AnalyticsSettings::from(config));

    match &args.command {
        Command::Kpis { season } => {
            let kpis = analytics.farm_kpis(&SeasonId::from(season.as_str())).await?;
            to_json(&kpis)
        }
        Command::Trend {
            season,
            pond,
            log,
            range,
            now,
        } => {
            let pond = pond.as_deref().map(PondId::from);
            let trend = analytics
                .trend(
                    &SeasonId::from(season.as_str()),
                    pond.as_ref(),
                    (*log).into(),
                    *range,
                    reference_time(now.as_deref())?,
                )
                .await?;
            to_json(&trend)
        }
        Command::Compare {
            pond_a,
            pond_b,
            metrics,
            mode,
            from,
            to,
            now,
        } => {
            let request = ComparisonRequest {
                pond_a: PondId::from(pond_a.as_str()),
                pond_b: PondId::from(pond_b.as_str()),
                metrics: metrics.clone(),
                mode: *mode,
                date_range: from.zip(*to).map(|(start, end)| DateRange::new(start, end)),
            };
            debug!(?request, "Running comparison");
            let result = analytics
                .compare(&request, reference_time(now.as_deref())?)
                .await?;
            to_json(&result)
        }
        Command::Report { season, format } => {
            let format = format.unwrap_or(config.report.format);
            info!(format = ?format, "Rendering report");
            Ok(analytics
                .export_report(&SeasonId::from(season.as_str()), format, Utc::now())
                .await?)
        }
    }
}
