//! Read-only HTTP JSON API over the Hawaii climate SQLite dataset.
//!
//! The dataset holds date-stamped precipitation and temperature
//! observations keyed by weather station. This service exposes a small
//! set of canned aggregate queries as JSON; there is no write path and
//! the database is treated as immutable for the process lifetime.
//!
//! # Routes
//!
//! ```text
//! GET /                            plain-text route listing
//! GET /api/v1.0/precipitation      { "<date>": <prcp or null>, ... }
//! GET /api/v1.0/stations           ["<station_id>", ...]
//! GET /api/v1.0/tobs               [<tobs>, ...]
//! GET /api/v1.0/<start>            [min, max, avg]
//! GET /api/v1.0/<start>/<end>      [min, max, avg]
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`db`]: SQLite access and query functions
//! - [`api`]: HTTP router and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, SetupError};
