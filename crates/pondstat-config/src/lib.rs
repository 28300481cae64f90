//! # Pondstat Config
//!
//! Type-safe configuration for Pondstat.
//!
//! This crate provides the configuration schema, its defaults, validation,
//! and loading from YAML with `PONDSTAT_*` environment overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::*;
