//! # Pondstat CLI
//!
//! Command line front-end: loads configuration, reads a JSON export of the
//! farm records and prints KPIs, trends, comparisons or reports.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Args, Command, LogArg};
pub use commands::run;
pub use error::{CliError, CliResult};

use pondstat_config::{Config, ConfigError, ConfigLoader};

/// Load configuration from `--config` or the default search path, then apply
/// the `--log-level` override.
pub fn load_config(args: &Args) -> CliResult<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
        config.validate_all().map_err(ConfigError::from)?;
    }

    Ok(config)
}
