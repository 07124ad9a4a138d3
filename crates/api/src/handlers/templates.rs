//! Handlers for the template catalog.

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::Json;
use repodeck_core::templates::{
    resolve_template, template_ids, validate_target_name, DEFAULT_TEMPLATE_ID,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;

/// Target name used when a preview does not supply one.
const PREVIEW_NAME: &str = "my-service";

/// One catalog entry as listed by `GET /templates`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: &'static str,
    pub version: String,
    pub language: String,
    pub deploy_target: String,
    pub secrets: Vec<String>,
    pub files: Vec<String>,
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /api/v1/templates
pub async fn list_templates() -> AppResult<impl IntoResponse> {
    let summaries: Vec<TemplateSummary> = template_ids()
        .into_iter()
        .map(|id| {
            let template = resolve_template(id, PREVIEW_NAME, "").template;
            TemplateSummary {
                id,
                version: template.version,
                language: template.language,
                deploy_target: template.deploy_target,
                secrets: template.secrets,
                files: template.files.into_iter().map(|f| f.path).collect(),
                is_default: id == DEFAULT_TEMPLATE_ID,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/templates/{id}?name=&description=
///
/// Render the template for a prospective repository without creating
/// anything. Unknown ids resolve to the default with `fellBack: true`.
pub async fn preview_template(
    Path(id): Path<String>,
    Query(params): Query<PreviewParams>,
) -> AppResult<impl IntoResponse> {
    let name = params.name.as_deref().map(str::trim).unwrap_or(PREVIEW_NAME);
    validate_target_name(name)?;

    let resolution = resolve_template(&id, name, params.description.as_deref().unwrap_or(""));
    if resolution.fell_back {
        tracing::debug!(requested = %id, "Preview fell back to default template");
    }

    Ok(Json(DataResponse { data: resolution }))
}
