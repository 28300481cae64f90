//! Command line arguments.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pondstat_analytics::{AlignMode, TimeRange};
use pondstat_common::ReadingKind;
use pondstat_config::ReportFormat;
use std::path::PathBuf;

/// Farm analytics over an exported record snapshot.
#[derive(Parser, Debug)]
#[command(name = "pondstat", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "PONDSTAT_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// JSON export of the farm records
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty debug logging with spans, ignoring the logging configuration
    #[arg(long)]
    pub dev: bool,

    /// Analysis to run
    #[command(subcommand)]
    pub command: Command,
}

/// Analyses.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Season KPIs as JSON
    Kpis {
        /// Season id
        #[arg(long)]
        season: String,
    },

    /// Bucketed trend of one log as JSON
    Trend {
        /// Season id
        #[arg(long)]
        season: String,
        /// Restrict to one pond
        #[arg(long)]
        pond: Option<String>,
        /// Log to analyse
        #[arg(long, value_enum, default_value = "water")]
        log: LogArg,
        /// week, month or quarter
        #[arg(long, default_value = "week")]
        range: TimeRange,
        /// End of the window, defaults to the current local time
        #[arg(long)]
        now: Option<String>,
    },

    /// Aligned comparison of two ponds as JSON
    Compare {
        /// Left-hand pond
        #[arg(long)]
        pond_a: String,
        /// Right-hand pond
        #[arg(long)]
        pond_b: String,
        /// Metric to compare, repeatable
        #[arg(long = "metric", required = true)]
        metrics: Vec<String>,
        /// absolute or relative
        #[arg(long, default_value = "absolute")]
        mode: AlignMode,
        /// First day of an absolute comparison
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day of an absolute comparison
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        /// Reference time for the default lookback, defaults to the current local time
        #[arg(long)]
        now: Option<String>,
    },

    /// Season report as JSON or CSV
    Report {
        /// Season id
        #[arg(long)]
        season: String,
        /// json or csv, defaults to the configured format
        #[arg(long)]
        format: Option<ReportFormat>,
    },
}

/// Operational log selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    /// Feed entries
    Feed,
    /// Water-quality readings
    Water,
    /// Growth samplings
    Growth,
}

impl From<LogArg> for ReadingKind {
    fn from(value: LogArg) -> Self {
        match value {
            LogArg::Feed => Self::Feed,
            LogArg::Water => Self::WaterQuality,
            LogArg::Growth => Self::Growth,
        }
    }
}
