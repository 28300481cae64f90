//! Main entry point for the pondstat command line tool.

use clap::Parser;
use pondstat_cli::{load_config, run, Args, CliResult};
use pondstat_common::{init_default_logging, init_dev_logging, init_logging};
use std::process::ExitCode;
use tracing::{error, info};

async fn execute(args: Args) -> CliResult<()> {
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            // Unusable configuration: log the failure with default settings.
            init_default_logging()?;
            return Err(e);
        }
    };

    if args.dev {
        init_dev_logging()?;
    } else {
        init_logging(config.logging.to_logging_config())?;
    }

    info!(snapshot = %args.snapshot.display(), "Starting pondstat");

    let output = run(&args, &config).await?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, output).await?;
            info!(path = %path.display(), "Wrote output");
        }
        None => println!("{output}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match execute(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("pondstat failed: {e}");
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
