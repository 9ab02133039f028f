//! Liveness and build identification
//!
//! Both routes are static: neither touches the dataset store.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Identification captured by `build.rs`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

pub const BUILD: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    git_hash: env!("GIT_HASH"),
    build_timestamp: env!("BUILD_TIMESTAMP"),
    build_profile: env!("BUILD_PROFILE"),
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: env!("CARGO_PKG_NAME"),
        version: BUILD.version,
    })
}

/// GET /api/buildinfo
pub async fn build_info() -> Json<BuildInfo> {
    Json(BUILD)
}

/// `/health` and `/api/buildinfo`, open to any caller
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/buildinfo", get(build_info))
}
