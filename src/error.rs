//! Unified error types for the climate API.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced while serving a request.
///
/// Every variant maps directly to an HTTP response; nothing is retried
/// and nothing is swallowed.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The dataset could not be opened or a query failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The blocking query task panicked or was cancelled.
    #[error("query task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// The measurement table holds no rows, so the most-active station
    /// cannot be determined.
    #[error("no measurement data")]
    NoMeasurements,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(_) | ApiError::TaskJoin(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NoMeasurements => StatusCode::NOT_FOUND,
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Errors raised during process startup, before any request is served.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The configured database file does not exist.
    #[error("database file not found: {0}")]
    DatabaseMissing(PathBuf),

    /// A required table is absent from the dataset.
    #[error("required table missing: {0}")]
    MissingTable(&'static str),

    /// A required column is absent from a table.
    #[error("table {table} is missing column {column}")]
    MissingColumn {
        /// Table that failed validation.
        table: &'static str,
        /// Column that was not found.
        column: &'static str,
    },

    /// The schema check itself failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Convenient Result type alias for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;
