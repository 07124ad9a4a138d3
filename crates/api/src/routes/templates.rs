use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template catalog routes mounted at `/templates`.
///
/// ```text
/// GET    /          -> list_templates
/// GET    /{id}      -> preview_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(templates::list_templates))
        .route("/{id}", get(templates::preview_template))
}
