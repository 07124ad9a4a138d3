#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use repodeck_api::config::{HostingBackend, ServerConfig};
use repodeck_api::router::build_app_router;
use repodeck_api::state::AppState;
use repodeck_hosting::MemoryHosting;

pub const OWNER: &str = "acme";

/// Build a test `ServerConfig` with the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        hosting: HostingBackend::Memory {
            owner: OWNER.to_string(),
        },
    }
}

/// Build the full application router over a shared in-memory platform.
///
/// The platform handle is returned so tests can seed state and inspect
/// calls.
pub fn build_test_app() -> (Router, Arc<MemoryHosting>) {
    let hosting = Arc::new(MemoryHosting::new(OWNER));
    let state = AppState {
        config: Arc::new(test_config()),
        platform: hosting.clone(),
    };
    (build_app_router(state), hosting)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
