//! # Pondstat Common
//!
//! Shared record types, errors, logging and utilities for Pondstat.
//!
//! This crate provides the foundational types used across the analytics
//! engine, the configuration layer and the command line front-end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{PondstatError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
