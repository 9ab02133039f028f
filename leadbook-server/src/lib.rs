//! leadbook-server library - HTTP surface over the dataset service
//!
//! Routes mirror the CSV endpoints the web UI calls: upload/merge, table
//! data, download, and a dataset listing.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use leadbook_common::config::DEFAULT_MAX_UPLOAD_BYTES;
use leadbook_common::{DatasetName, DatasetService};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod error;
pub mod logging;

pub use error::{ApiError, ApiResult};

/// Room for multipart framing and the `fileName` field on top of the file
/// itself, so an oversized file is reported as such rather than as a
/// truncated body.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DatasetService>,
    /// Largest accepted upload file, in bytes
    pub max_upload_bytes: usize,
    /// Dataset used when a request names none
    pub default_dataset: DatasetName,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(service: Arc<DatasetService>) -> Self {
        Self {
            service,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_dataset: DatasetName::default(),
            cors_origins: Vec::new(),
        }
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_default_dataset(mut self, name: DatasetName) -> Self {
        self.default_dataset = name;
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Resolve a dataset name from request input. Blank means the default;
    /// anything that is not a single plain file name is rejected.
    pub fn dataset_name(&self, raw: Option<&str>) -> ApiResult<DatasetName> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Ok(self.default_dataset.clone());
        };
        let name = DatasetName::new(raw);
        if !name.is_single_component() {
            return Err(ApiError::InvalidDatasetName(raw.to_string()));
        }
        Ok(name)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    let csv_routes = Router::new()
        .route("/api/csv/upload", post(api::upload_csv))
        .route("/api/csv/data", get(api::get_csv_data))
        .route("/api/csv/download", get(api::download_csv))
        .route("/api/csv/files", get(api::list_csv_files))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .merge(csv_routes)
        .merge(api::status_routes())
        .layer(cors_layer(&state.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
