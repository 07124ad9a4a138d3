use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repodeck_control::ControlError;
use repodeck_core::error::CoreError;
use repodeck_hosting::HostingError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps control plane and domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failure from a control plane operation.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// A domain-level error from `repodeck_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<HostingError> for AppError {
    fn from(err: HostingError) -> Self {
        AppError::Control(ControlError::Hosting(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) | AppError::Control(ControlError::Core(core)) => {
                classify_core_error(core)
            }
            AppError::Control(ControlError::Hosting(err)) => classify_hosting_error(err),
            AppError::Control(ControlError::Serialization(err)) => {
                tracing::error!(error = %err, "Registry serialization error");
                internal()
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Map a hosting platform failure.
///
/// - `NotFound` maps to 404.
/// - Rejected credentials map to 502 `UPSTREAM_UNAUTHORIZED`.
/// - Everything else maps to 502 `UPSTREAM_ERROR`.
fn classify_hosting_error(err: &HostingError) -> (StatusCode, &'static str, String) {
    match err {
        HostingError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Not found on hosting platform: {resource}"),
        ),
        HostingError::Unauthorized { status, .. } => {
            tracing::error!(status, "Hosting platform rejected credentials");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAUTHORIZED",
                "Hosting platform rejected the configured credentials".to_string(),
            )
        }
        HostingError::Api { status, body } => {
            tracing::error!(status, body = %body, "Hosting platform API error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                format!("Hosting platform returned status {status}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Hosting platform request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Hosting platform request failed".to_string(),
            )
        }
    }
}
