//! Handlers for scaffolding, status, registry and environments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use repodeck_control::environment;
use repodeck_control::registry::{self, RegistrySource};
use repodeck_control::scaffold::{scaffold_repository, ScaffoldRequest};
use repodeck_core::registry::{RegistryEntry, UpsertOutcome};
use repodeck_core::status::{infer_status_now, RepoStatusMeta};
use repodeck_core::types::RepoRef;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStatus {
    pub full_name: String,
    #[serde(flatten)]
    pub status: RepoStatusMeta,
}

#[derive(Debug, Serialize)]
pub struct RegistryView {
    pub entries: Vec<RegistryEntry>,
    pub source: RegistrySource,
}

#[derive(Debug, Serialize)]
pub struct SavedEntry {
    pub outcome: UpsertOutcome,
    pub entry: RegistryEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentRequest {
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Source branch. The repository's default branch when omitted.
    pub default_branch: Option<String>,
}

// ---------------------------------------------------------------------------
// Scaffold
// ---------------------------------------------------------------------------

/// POST /api/v1/repositories
///
/// Create a repository from a template and register it. Returns 201.
pub async fn scaffold(
    State(state): State<AppState>,
    Json(input): Json<ScaffoldRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = scaffold_repository(state.platform.as_ref(), &input).await?;

    tracing::info!(
        repo = %outcome.repo.full_name,
        template = %outcome.template.name,
        "Repository scaffolded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/repositories/{owner}/{repo}/status
pub async fn get_status(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let repository = state.platform.get_repository(&owner, &repo).await?;
    let status = infer_status_now(&repository.snapshot());

    tracing::debug!(
        repo = %repository.full_name,
        tier = status.tier.as_str(),
        deployment = status.deployment_status.as_str(),
        "Status inferred",
    );

    Ok(Json(DataResponse {
        data: RepositoryStatus {
            full_name: repository.full_name,
            status,
        },
    }))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// GET /api/v1/repositories/{owner}/{repo}/registry
pub async fn get_registry(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let ctx = RepoRef::new(owner, repo);
    let load = registry::load_registry(state.platform.as_ref(), &ctx).await?;

    Ok(Json(DataResponse {
        data: RegistryView {
            entries: load.collection.into_entries(),
            source: load.source,
        },
    }))
}

/// PUT /api/v1/repositories/{owner}/{repo}/registry
///
/// Insert or replace one entry, keyed by its owner and repo name.
pub async fn save_registry_entry(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Json(entry): Json<RegistryEntry>,
) -> AppResult<impl IntoResponse> {
    if entry.owner.trim().is_empty() || entry.repo_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Registry entry requires owner and repoName".to_string(),
        ));
    }

    let ctx = RepoRef::new(owner, repo);
    let outcome = registry::save_registry_entry(state.platform.as_ref(), &ctx, entry.clone()).await?;

    Ok(Json(DataResponse {
        data: SavedEntry { outcome, entry },
    }))
}

/// POST /api/v1/repositories/{owner}/{repo}/registry/{entry_owner}/{entry_repo}/archive
pub async fn archive_registry_entry(
    State(state): State<AppState>,
    Path((owner, repo, entry_owner, entry_repo)): Path<(String, String, String, String)>,
) -> AppResult<impl IntoResponse> {
    let ctx = RepoRef::new(owner, repo);
    let entry = registry::archive_registry_entry(
        state.platform.as_ref(),
        &ctx,
        &entry_owner,
        &entry_repo,
    )
    .await?;

    Ok(Json(DataResponse { data: entry }))
}

// ---------------------------------------------------------------------------
// Environments
// ---------------------------------------------------------------------------

/// POST /api/v1/repositories/{owner}/{repo}/environments
///
/// Returns 201 with the branch, committed paths and the notification text.
pub async fn create_environment(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Json(input): Json<CreateEnvironmentRequest>,
) -> AppResult<impl IntoResponse> {
    let ctx = RepoRef::new(owner, repo);
    let default_branch = match input.default_branch {
        Some(branch) => branch,
        None => {
            state
                .platform
                .get_repository(&ctx.owner, &ctx.repo)
                .await?
                .default_branch
        }
    };

    let result = environment::create_environment(
        state.platform.as_ref(),
        &ctx,
        input.slug.trim(),
        &input.description,
        &default_branch,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}
