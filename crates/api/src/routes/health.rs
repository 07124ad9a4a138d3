use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::HostingBackend;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `github` or `memory`.
    pub hosting_backend: &'static str,
}

/// GET /health -- liveness and configured backend.
///
/// Does not call the hosting platform.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let hosting_backend = match state.config.hosting {
        HostingBackend::GitHub(_) => "github",
        HostingBackend::Memory { .. } => "memory",
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        hosting_backend,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
