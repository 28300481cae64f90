//! Application-wide error types using thiserror.

use pondstat_common::PondstatError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Engine, store or configuration error.
    #[error(transparent)]
    Pondstat(#[from] PondstatError),

    /// Invalid command line input.
    #[error("Invalid argument: {0}")]
    Usage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<pondstat_config::ConfigError> for CliError {
    fn from(err: pondstat_config::ConfigError) -> Self {
        Self::Pondstat(err.into())
    }
}

impl CliError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Pondstat(inner) if inner.is_caller_error() => 2,
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
