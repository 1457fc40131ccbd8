//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    health, index, metrics_text, precipitation, start_date, start_end_date, stations, tobs,
    AppState,
};

/// Create the API router.
///
/// Static segments win over the `:start` capture at the same position,
/// so `/api/v1.0/precipitation` never resolves as a start date.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        // Health and metrics endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        // Dataset endpoints
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/:start", get(start_date))
        .route("/api/v1.0/:start/:end", get(start_end_date))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    /// Build a router over a temporary dataset file. The guard keeps
    /// the file alive for the test's duration.
    fn test_app() -> (Router, NamedTempFile) {
        let file = NamedTempFile::new().unwrap();
        let conn = rusqlite::Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE measurement (
                 id INTEGER PRIMARY KEY,
                 station TEXT NOT NULL,
                 date TEXT NOT NULL,
                 prcp REAL,
                 tobs REAL NOT NULL
             );
             CREATE TABLE station (
                 id INTEGER PRIMARY KEY,
                 station TEXT NOT NULL UNIQUE
             );
             INSERT INTO station (station) VALUES ('A'), ('B');
             INSERT INTO measurement (station, date, prcp, tobs) VALUES
                 ('A', '2017-01-01', 1.0, 10.0),
                 ('A', '2017-01-02', 2.0, 20.0),
                 ('B', '2017-01-01', 0.5, 5.0);",
        )
        .unwrap();

        let app = create_router(AppState::new(file.path()));
        (app, file)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_serves_plain_text_route_listing() {
        let (app, _db) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/plain"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = std::str::from_utf8(&bytes).unwrap();
        assert!(body.contains("/api/v1.0/precipitation"));
        assert!(body.contains("/api/v1.0/<start>/<end>"));
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn precipitation_maps_dates_last_row_wins() {
        let (app, _db) = test_app();

        // Both stations observed 2017-01-01; B's row comes later in
        // query order, so its value survives the collapse.
        let (status, body) = get_json(app, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"2017-01-01": 0.5, "2017-01-02": 2.0}));
    }

    #[tokio::test]
    async fn stations_lists_every_station() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::OK);
        let stations = body.as_array().unwrap();
        assert_eq!(stations.len(), 2);
        assert!(stations.contains(&json!("A")));
        assert!(stations.contains(&json!("B")));
    }

    #[tokio::test]
    async fn tobs_serves_most_active_station_observations() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([10.0, 20.0]));
    }

    #[tokio::test]
    async fn tobs_on_empty_dataset_is_a_defined_error() {
        let file = NamedTempFile::new().unwrap();
        let conn = rusqlite::Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE measurement (station TEXT, date TEXT, prcp REAL, tobs REAL);
             CREATE TABLE station (station TEXT);",
        )
        .unwrap();
        let app = create_router(AppState::new(file.path()));

        let (status, body) = get_json(app, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "no measurement data"}));
    }

    #[tokio::test]
    async fn start_route_returns_min_max_avg_triple() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/api/v1.0/2017-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0], json!(5.0));
        assert_eq!(body[1], json!(20.0));
        let avg = body[2].as_f64().unwrap();
        assert!((avg - 35.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn start_route_with_future_date_returns_null_triple() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/api/v1.0/2099-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([null, null, null]));
    }

    #[tokio::test]
    async fn start_end_route_single_day() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/api/v1.0/2017-01-01/2017-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([5.0, 10.0, 7.5]));
    }

    #[tokio::test]
    async fn start_end_route_inverted_range_returns_null_triple() {
        let (app, _db) = test_app();

        let (status, body) = get_json(app, "/api/v1.0/2017-01-02/2017-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([null, null, null]));
    }

    #[tokio::test]
    async fn static_segments_outrank_the_start_capture() {
        let (app, _db) = test_app();

        // "precipitation" must route to the precipitation handler, not
        // parse as a start date.
        let (status, body) = get_json(app, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_object());
    }

    #[tokio::test]
    async fn unreachable_database_is_a_server_error() {
        let app = create_router(AppState::new("/nonexistent/climate.sqlite"));

        let (status, body) = get_json(app, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn metrics_without_recorder_is_not_found() {
        let (app, _db) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
