//! SQLite access for the climate dataset.
//!
//! The dataset is read-only for the process lifetime: every query opens
//! a fresh read-only connection, runs on the blocking pool, and drops
//! the connection before the response is produced. There is no pool and
//! no retry policy; an unreachable database fails the request.

pub mod queries;
pub mod schema;

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

pub use queries::{
    all_stations, most_active_station, precipitation_since, temperature_stats,
    tobs_for_station_since, TemperatureStats,
};
pub use schema::validate_schema;

/// Fixed lower bound used by the precipitation and tobs queries: one
/// year before the dataset's last recorded date.
pub const CUTOFF_DATE: &str = "2016-08-23";

/// Open a read-only connection to the dataset.
pub fn open_read_only(path: &Path) -> rusqlite::Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags)
}
