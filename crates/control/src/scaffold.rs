//! Scaffold a new repository from a catalog template.

use chrono::Utc;
use repodeck_core::commands::{deploy_commands, verify_steps};
use repodeck_core::registry::RegistryEntry;
use repodeck_core::templates::{resolve_template, validate_target_name, RepoTemplate, DEFAULT_TEMPLATE_ID};
use repodeck_hosting::types::{FileWrite, Repo};
use repodeck_hosting::HostingPlatform;
use serde::{Deserialize, Serialize};

use crate::error::ControlError;
use crate::registry::save_registry_entry;

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

fn default_private() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_template_id")]
    pub template_id: String,
    #[serde(default = "default_private")]
    pub private: bool,
}

impl ScaffoldRequest {
    pub fn new(name: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            template_id: template_id.into(),
            private: true,
        }
    }
}

/// Everything produced by a successful scaffold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldOutcome {
    pub repo: Repo,
    pub template: RepoTemplate,
    pub registry_entry: RegistryEntry,
    pub deploy_commands: Vec<String>,
    pub verify_steps: Vec<String>,
}

/// Commit message for one scaffolded file.
pub fn commit_message(template_name: &str, path: &str) -> String {
    format!("scaffold({template_name}): add {path}")
}

/// Create a repository, commit the rendered template files onto its
/// default branch in order, then record it in its own registry.
///
/// A failed step aborts the rest. Nothing already created is rolled back,
/// and the registry entry is only written after every file is committed.
pub async fn scaffold_repository(
    platform: &dyn HostingPlatform,
    request: &ScaffoldRequest,
) -> Result<ScaffoldOutcome, ControlError> {
    let name = request.name.trim();
    validate_target_name(name)?;

    let resolution = resolve_template(&request.template_id, name, &request.description);
    if resolution.fell_back {
        tracing::warn!(
            requested = %resolution.requested_id,
            template = DEFAULT_TEMPLATE_ID,
            "Unknown template id, using default template",
        );
    }
    let template = resolution.template;

    let repo = platform
        .create_repository(name, &request.description, request.private)
        .await
        .inspect_err(|e| tracing::error!(step = "create_repository", repo = name, error = %e, "Scaffold failed"))?;
    tracing::info!(
        repo = %repo.full_name,
        template = %template.name,
        version = %template.version,
        "Repository created",
    );

    for file in &template.files {
        // No branch: the platform commits to the default branch, creating
        // it on the first write to the empty repository.
        let write = FileWrite::create(
            &file.path,
            &file.content,
            commit_message(&template.name, &file.path),
        );

        platform
            .put_file_content(&repo.owner, &repo.name, &write)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    step = "put_file_content",
                    repo = %repo.full_name,
                    path = %file.path,
                    error = %e,
                    "Scaffold failed",
                )
            })?;
        tracing::info!(repo = %repo.full_name, path = %file.path, "Template file committed");
    }

    let entry = RegistryEntry::from_template(&repo.owner, &repo.name, &template, Utc::now());
    save_registry_entry(platform, &repo.repo_ref(), entry.clone())
        .await
        .inspect_err(|e| tracing::error!(step = "save_registry_entry", repo = %repo.full_name, error = %e, "Scaffold failed"))?;

    let outcome = ScaffoldOutcome {
        deploy_commands: deploy_commands(&entry),
        verify_steps: verify_steps(&entry),
        repo,
        template,
        registry_entry: entry,
    };
    tracing::info!(
        repo = %outcome.repo.full_name,
        files = outcome.template.files.len(),
        "Scaffold complete",
    );
    Ok(outcome)
}
