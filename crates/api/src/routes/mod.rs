pub mod health;
pub mod repositories;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /templates                                         list catalog
/// /templates/{id}                                    resolved preview
///
/// /repositories                                      scaffold (POST)
/// /repositories/{owner}/{repo}/status                inferred status
/// /repositories/{owner}/{repo}/registry              get, upsert entry (PUT)
/// /repositories/{owner}/{repo}/registry/{entry_owner}/{entry_repo}/archive
///                                                    archive entry (POST)
/// /repositories/{owner}/{repo}/environments          provision environment (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/repositories", repositories::router())
}
