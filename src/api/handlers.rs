//! HTTP API handlers.
//!
//! Every query handler is a stateless request → query → response
//! mapping: it runs one dataset round trip on the blocking pool over a
//! fresh read-only connection, reshapes the rows into JSON, and holds
//! nothing across requests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db;
use crate::error::{ApiError, Result};
use crate::metrics;

// Route labels for metrics.
const ROUTE_PRECIPITATION: &str = "precipitation";
const ROUTE_STATIONS: &str = "stations";
const ROUTE_TOBS: &str = "tobs";
const ROUTE_START: &str = "start";
const ROUTE_START_END: &str = "start_end";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Path to the dataset; each request opens its own connection.
    db_path: Arc<PathBuf>,
    /// Prometheus rendering handle, when a recorder is installed.
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state for the dataset at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render.
    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Run one query against a fresh read-only connection on the
    /// blocking pool. The connection is dropped before this returns.
    async fn query<T, F>(&self, route: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        metrics::record_request(route);
        let path = Arc::clone(&self.db_path);
        let started = Instant::now();

        let result = tokio::task::spawn_blocking(move || -> rusqlite::Result<T> {
            let conn = db::open_read_only(&path)?;
            f(&conn)
        })
        .await;
        metrics::record_query_latency(route, started.elapsed());

        match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                metrics::record_request_error(route);
                Err(e.into())
            }
            Err(e) => {
                metrics::record_request_error(route);
                Err(e.into())
            }
        }
    }
}

/// Plain-text body served at the root.
pub const INDEX_BODY: &str = "Welcome to the Hawaii Climate API!\n\
Available Routes:\n\
/api/v1.0/precipitation\n\
/api/v1.0/stations\n\
/api/v1.0/tobs\n\
/api/v1.0/<start>\n\
/api/v1.0/<start>/<end>\n";

/// Root handler: fixed route listing, no query.
pub async fn index() -> &'static str {
    INDEX_BODY
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Precipitation for the last year of the dataset, keyed by date.
///
/// Dates are not unique across stations, so the reshape collapses
/// duplicates: the last row in query order wins for a given date. Null
/// precipitation values stay null in the output.
pub async fn precipitation(State(state): State<AppState>) -> Result<Json<Map<String, Value>>> {
    let rows = state
        .query(ROUTE_PRECIPITATION, |conn| {
            db::precipitation_since(conn, db::CUTOFF_DATE)
        })
        .await?;

    let mut body = Map::new();
    for (date, prcp) in rows {
        body.insert(date, prcp.into());
    }
    Ok(Json(body))
}

/// All station identifiers, in engine order.
pub async fn stations(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let stations = state.query(ROUTE_STATIONS, db::all_stations).await?;
    Ok(Json(stations))
}

/// Temperature observations for the most-active station over the last
/// year of the dataset.
///
/// An empty measurement table means there is no most-active station;
/// that surfaces as a 404, never a panic.
pub async fn tobs(State(state): State<AppState>) -> Result<Json<Vec<f64>>> {
    let observations = state
        .query(ROUTE_TOBS, |conn| {
            match db::most_active_station(conn)? {
                Some(station) => {
                    db::tobs_for_station_since(conn, &station, db::CUTOFF_DATE).map(Some)
                }
                None => Ok(None),
            }
        })
        .await?;

    match observations {
        Some(observations) => Ok(Json(observations)),
        None => {
            metrics::record_request_error(ROUTE_TOBS);
            Err(ApiError::NoMeasurements)
        }
    }
}

/// `[min, max, avg]` temperature from `start` onward.
///
/// `start` is passed through verbatim to a string comparison; no date
/// validation happens here. Zero matching rows produce
/// `[null, null, null]` with a 200.
pub async fn start_date(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<[Option<f64>; 3]>> {
    let stats = state
        .query(ROUTE_START, move |conn| {
            db::temperature_stats(conn, &start, None)
        })
        .await?;
    Ok(Json(stats.into_triple()))
}

/// `[min, max, avg]` temperature between `start` and `end` inclusive.
///
/// Neither bound is validated and `start <= end` is not enforced; an
/// inverted range matches zero rows and yields `[null, null, null]`.
pub async fn start_end_date(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<[Option<f64>; 3]>> {
    let stats = state
        .query(ROUTE_START_END, move |conn| {
            db::temperature_stats(conn, &start, Some(&end))
        })
        .await?;
    Ok(Json(stats.into_triple()))
}

/// Prometheus exposition handler.
pub async fn metrics_text(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
