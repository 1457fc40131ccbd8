//! Prometheus metrics for request and query monitoring.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

// === Metric Name Constants ===

/// Requests served counter metric name.
pub const METRIC_REQUESTS: &str = "climate_requests_total";
/// Request errors counter metric name.
pub const METRIC_REQUEST_ERRORS: &str = "climate_request_errors_total";
/// Dataset query latency metric name.
pub const METRIC_QUERY_LATENCY: &str = "climate_query_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_REQUESTS, "Requests served, labelled by route");
    describe_counter!(
        METRIC_REQUEST_ERRORS,
        "Requests that produced an error response, labelled by route"
    );
    describe_histogram!(
        METRIC_QUERY_LATENCY,
        "Dataset query latency in milliseconds, labelled by route"
    );
}

/// Record one served request for `route`.
pub fn record_request(route: &'static str) {
    counter!(METRIC_REQUESTS, "route" => route).increment(1);
}

/// Record one error response for `route`.
pub fn record_request_error(route: &'static str) {
    counter!(METRIC_REQUEST_ERRORS, "route" => route).increment(1);
}

/// Record the dataset round-trip latency for `route`.
pub fn record_query_latency(route: &'static str, elapsed: Duration) {
    histogram!(METRIC_QUERY_LATENCY, "route" => route).record(elapsed.as_secs_f64() * 1000.0);
}
