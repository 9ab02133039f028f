//! Error types for leadbook-server
//!
//! Input problems map to 400, storage problems to 500. Bodies carry an
//! `error` summary plus whatever detail lets the UI explain the rejection.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leadbook_common::IngestError;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

const MIB: f64 = 1024.0 * 1024.0;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload request without a `file` part (400)
    #[error("No file provided")]
    NoFile,

    /// Dataset name that is not a plain file name (400)
    #[error("Invalid dataset name: {0}")]
    InvalidDatasetName(String),

    /// Multipart body could not be read
    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    /// Merge, fetch or export failure
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

fn too_large_details(actual: usize, limit: usize) -> String {
    format!(
        "File size ({:.2}MB) exceeds the maximum limit of {}MB",
        actual as f64 / MIB,
        (limit as f64 / MIB).round()
    )
}

impl ApiError {
    fn parts(&self) -> (StatusCode, Value) {
        match self {
            ApiError::NoFile => (StatusCode::BAD_REQUEST, json!({ "error": "No file provided" })),
            ApiError::InvalidDatasetName(name) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid dataset name",
                    "details": format!("\"{}\" must be a plain file name", name),
                }),
            ),
            ApiError::Multipart(e) => (
                e.status(),
                json!({ "error": "Malformed upload", "details": e.body_text() }),
            ),
            ApiError::Ingest(e) => ingest_parts(e),
        }
    }
}

fn ingest_parts(e: &IngestError) -> (StatusCode, Value) {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let body = match e {
        IngestError::EmptyInput | IngestError::NoDataRows => json!({ "error": e.to_string() }),
        IngestError::Schema {
            source,
            expected,
            received,
        } => json!({
            "error": "CSV validation failed",
            "details": source.to_string(),
            "expectedColumns": expected,
            "receivedColumns": received,
        }),
        IngestError::Parse(source) => json!({
            "error": "Failed to parse CSV file",
            "details": source.to_string(),
            "line": source.line(),
        }),
        IngestError::TooLarge { limit, actual } => json!({
            "error": "File too large",
            "details": too_large_details(*actual, *limit),
        }),
        IngestError::CorruptDataset { .. }
        | IngestError::StoreRead { .. }
        | IngestError::StoreWrite { .. } => {
            json!({ "error": "Dataset storage error", "details": e.to_string() })
        }
    };
    (status, body)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use leadbook_common::{CsvError, SchemaError, StoreError};

    #[test]
    fn schema_error_body_lists_columns() {
        let err = ApiError::from(IngestError::Schema {
            source: SchemaError::ColumnCountMismatch { expected: 8, actual: 1 },
            expected: vec!["Name".into()],
            received: vec!["Nope".into()],
        });
        let (status, body) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "CSV validation failed");
        assert_eq!(body["details"], "Expected 8 columns, but found 1");
        assert_eq!(body["receivedColumns"][0], "Nope");
    }

    #[test]
    fn parse_error_reports_line() {
        let err = ApiError::from(IngestError::Parse(CsvError::UnterminatedQuote { line: 4 }));
        let (status, body) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["line"], 4);
    }

    #[test]
    fn store_failures_are_server_errors() {
        let err = ApiError::from(IngestError::StoreWrite {
            dataset: "leads.csv".into(),
            source: StoreError::Backend("disk full".into()),
        });
        assert_eq!(err.parts().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn corrupt_dataset_is_server_error() {
        let err = ApiError::from(IngestError::CorruptDataset {
            dataset: "leads.csv".into(),
            source: CsvError::UnterminatedQuote { line: 2 },
        });
        let (status, body) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Dataset storage error");
    }

    #[test]
    fn too_large_is_bad_request() {
        let err = ApiError::from(IngestError::TooLarge {
            limit: 50 * 1024 * 1024,
            actual: 60 * 1024 * 1024,
        });
        let (status, body) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File too large");
    }

    #[test]
    fn too_large_details_use_megabytes() {
        let details = too_large_details(60 * 1024 * 1024, 50 * 1024 * 1024);
        assert_eq!(details, "File size (60.00MB) exceeds the maximum limit of 50MB");
    }
}
