use axum::routing::{get, post};
use axum::Router;

use crate::handlers::repositories;
use crate::state::AppState;

/// Repository routes mounted at `/repositories`.
///
/// ```text
/// POST   /                                                   -> scaffold
/// GET    /{owner}/{repo}/status                              -> get_status
/// GET    /{owner}/{repo}/registry                            -> get_registry
/// PUT    /{owner}/{repo}/registry                            -> save_registry_entry
/// POST   /{owner}/{repo}/registry/{entry_owner}/{entry_repo}/archive
///                                                            -> archive_registry_entry
/// POST   /{owner}/{repo}/environments                        -> create_environment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(repositories::scaffold))
        .route("/{owner}/{repo}/status", get(repositories::get_status))
        .route(
            "/{owner}/{repo}/registry",
            get(repositories::get_registry).put(repositories::save_registry_entry),
        )
        .route(
            "/{owner}/{repo}/registry/{entry_owner}/{entry_repo}/archive",
            post(repositories::archive_registry_entry),
        )
        .route(
            "/{owner}/{repo}/environments",
            post(repositories::create_environment),
        )
}
