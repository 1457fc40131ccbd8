//! Startup schema validation.
//!
//! The known column set is declared explicitly and checked once against
//! the live database at startup; a missing table or column is fatal
//! before the server binds.

use rusqlite::Connection;

use crate::error::SetupError;

const MEASUREMENT_TABLE: &str = "measurement";
const MEASUREMENT_COLUMNS: [&str; 4] = ["station", "date", "prcp", "tobs"];

const STATION_TABLE: &str = "station";
const STATION_COLUMNS: [&str; 1] = ["station"];

/// Validate that both dataset tables exist with the columns the query
/// layer depends on.
pub fn validate_schema(conn: &Connection) -> Result<(), SetupError> {
    check_table(conn, MEASUREMENT_TABLE, &MEASUREMENT_COLUMNS)?;
    check_table(conn, STATION_TABLE, &STATION_COLUMNS)?;
    Ok(())
}

fn check_table(
    conn: &Connection,
    table: &'static str,
    required: &[&'static str],
) -> Result<(), SetupError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    // PRAGMA table_info returns no rows for an unknown table.
    if columns.is_empty() {
        return Err(SetupError::MissingTable(table));
    }

    for column in required {
        if !columns.iter().any(|c| c == column) {
            return Err(SetupError::MissingColumn { table, column });
        }
    }

    Ok(())
}
