//! Environment branch provisioning.

use chrono::Utc;
use repodeck_core::environment::{
    branch_name, issue_comment, render_files, validate_slug, EnvironmentProvisionResult,
};
use repodeck_core::error::CoreError;
use repodeck_core::types::RepoRef;
use repodeck_hosting::types::FileWrite;
use repodeck_hosting::HostingPlatform;

use crate::error::ControlError;

/// Create `env/<slug>` from `default_branch` in `ctx` and commit the
/// environment scaffold onto it.
///
/// The slug and the source branch are checked before anything is written.
/// A failure after the branch exists leaves it (and any files already
/// committed) in place.
pub async fn create_environment(
    platform: &dyn HostingPlatform,
    ctx: &RepoRef,
    slug: &str,
    description: &str,
    default_branch: &str,
) -> Result<EnvironmentProvisionResult, ControlError> {
    validate_slug(slug)?;

    let branches = platform.list_branches(&ctx.owner, &ctx.repo).await?;
    let source = branches
        .iter()
        .find(|b| b.name == default_branch)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Branch",
            key: default_branch.to_string(),
        })?;

    let branch = branch_name(slug);
    let created_at = Utc::now();
    let files = render_files(slug, description, created_at)?;

    platform
        .create_branch(&ctx.owner, &ctx.repo, &branch, &source.head_commit_sha)
        .await?;
    tracing::info!(
        repo = %ctx,
        branch = %branch,
        from = %source.name,
        sha = %source.head_commit_sha,
        "Environment branch created",
    );

    let mut paths = Vec::with_capacity(files.len());
    for file in files {
        let write = FileWrite::create(
            &file.path,
            &file.content,
            format!("env({slug}): add {}", file.path),
        )
        .on_branch(&branch);

        platform
            .put_file_content(&ctx.owner, &ctx.repo, &write)
            .await
            .inspect_err(|e| {
                tracing::error!(repo = %ctx, branch = %branch, path = %file.path, error = %e, "Environment file commit failed")
            })?;
        tracing::debug!(repo = %ctx, branch = %branch, path = %file.path, "Environment file committed");
        paths.push(file.path);
    }

    tracing::info!(repo = %ctx, branch = %branch, files = paths.len(), "Environment provisioned");

    Ok(EnvironmentProvisionResult {
        branch,
        files: paths,
        issue_comment: issue_comment(slug),
    })
}
