//! The five canned queries the API serves.
//!
//! All functions take a borrowed connection and issue exactly one query
//! pattern; reshaping into JSON stays in the handlers. Date filters are
//! plain string comparisons against the stored ISO 8601 text, matching
//! the dataset's own ordering semantics.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

/// All (date, prcp) pairs on or after `cutoff`, in query order.
pub fn precipitation_since(
    conn: &Connection,
    cutoff: &str,
) -> rusqlite::Result<Vec<(String, Option<f64>)>> {
    let mut stmt = conn.prepare("SELECT date, prcp FROM measurement WHERE date >= ?1")?;
    let rows = stmt.query_map(params![cutoff], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

/// Every station identifier, in whatever order the engine returns them.
pub fn all_stations(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT station FROM station")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

/// The station with the most measurement rows, or `None` when the
/// measurement table is empty. Ties break to the lexicographically
/// smallest station id so the result is deterministic.
pub fn most_active_station(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT station FROM measurement
         GROUP BY station
         ORDER BY COUNT(station) DESC, station ASC
         LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
}

/// All temperature observations for `station` on or after `cutoff`.
pub fn tobs_for_station_since(
    conn: &Connection,
    station: &str,
    cutoff: &str,
) -> rusqlite::Result<Vec<f64>> {
    let mut stmt =
        conn.prepare("SELECT tobs FROM measurement WHERE station = ?1 AND date >= ?2")?;
    let rows = stmt.query_map(params![station, cutoff], |row| row.get(0))?;
    rows.collect()
}

/// Aggregate temperature statistics over a date range.
///
/// SQL aggregates over zero rows yield NULL, so every field is optional;
/// an empty range produces three `None`s, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    /// Lowest observed temperature in range.
    pub min: Option<f64>,
    /// Highest observed temperature in range.
    pub max: Option<f64>,
    /// Mean observed temperature in range.
    pub avg: Option<f64>,
}

impl TemperatureStats {
    /// The `[min, max, avg]` triple the API responds with.
    pub fn into_triple(self) -> [Option<f64>; 3] {
        [self.min, self.max, self.avg]
    }
}

/// `min(tobs), max(tobs), avg(tobs)` over rows with `date >= start`,
/// optionally also bounded by `date <= end`.
///
/// No validation is performed on either bound; an inverted range simply
/// matches zero rows.
pub fn temperature_stats(
    conn: &Connection,
    start: &str,
    end: Option<&str>,
) -> rusqlite::Result<TemperatureStats> {
    let map = |row: &rusqlite::Row<'_>| {
        Ok(TemperatureStats {
            min: row.get(0)?,
            max: row.get(1)?,
            avg: row.get(2)?,
        })
    };

    match end {
        Some(end) => conn.query_row(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
             WHERE date >= ?1 AND date <= ?2",
            params![start, end],
            map,
        ),
        None => conn.query_row(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement WHERE date >= ?1",
            params![start],
            map,
        ),
    }
}
