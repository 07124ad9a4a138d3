//! Environment branch scaffolding: naming, validation, and file rendering.
//!
//! An environment is a short-lived branch `env/<slug>` carrying three
//! scaffold files under `environments/<slug>/`. The provisioner in
//! `repodeck_control::environment` commits what this module renders.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix for environment branch names.
pub const ENV_BRANCH_PREFIX: &str = "env/";

/// Directory holding each environment's scaffold files.
pub const ENV_DIR: &str = "environments";

/// Status recorded in a freshly provisioned environment's config.
pub const STATUS_PROVISIONING: &str = "provisioning";

/// Maximum slug length (fits a DNS label).
pub const MAX_SLUG_LENGTH: usize = 63;

/// Lowercase alphanumeric runs joined by single hyphens.
pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid slug regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A file to commit onto the environment branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFile {
    pub path: String,
    pub content: String,
}

/// Contents of `environments/<slug>/config.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    pub slug: String,
    pub branch: String,
    pub created_at: Timestamp,
    pub status: &'static str,
    pub vault: serde_json::Map<String, serde_json::Value>,
}

/// Returned to the caller after provisioning. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentProvisionResult {
    pub branch: String,
    pub files: Vec<String>,
    pub issue_comment: String,
}

// ---------------------------------------------------------------------------
// Naming and validation
// ---------------------------------------------------------------------------

/// Validate an environment slug: lowercase alphanumerics separated by
/// single hyphens, at most [`MAX_SLUG_LENGTH`] characters.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Environment slug must not be empty".to_string(),
        ));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Environment slug must not exceed {MAX_SLUG_LENGTH} characters, got {}",
            slug.len()
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Environment slug '{slug}' must be lowercase letters, digits and single hyphens"
        )));
    }
    Ok(())
}

/// Branch name for an environment slug.
pub fn branch_name(slug: &str) -> String {
    format!("{ENV_BRANCH_PREFIX}{slug}")
}

pub fn config_path(slug: &str) -> String {
    format!("{ENV_DIR}/{slug}/config.json")
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the three scaffold files in commit order: README, config, env
/// example.
pub fn render_files(
    slug: &str,
    description: &str,
    created_at: Timestamp,
) -> Result<Vec<EnvironmentFile>, CoreError> {
    let branch = branch_name(slug);

    let readme = format!(
        "# Environment: {slug}\n\
         \n\
         {description}\n\
         \n\
         - **Branch:** `{branch}`\n\
         - **Created:** {date}\n\
         - **Status:** {STATUS_PROVISIONING}\n\
         \n\
         ## Provisioning checklist\n\
         \n\
         - [ ] Fill in `.env.example` values in the deployment target\n\
         - [ ] Add secrets to the vault section of `config.json`\n\
         - [ ] Run the first deploy from `{branch}`\n\
         - [ ] Flip `status` in `config.json` to `active`\n",
        date = created_at.format("%Y-%m-%d"),
    );

    let config = EnvironmentConfig {
        slug: slug.to_string(),
        branch: branch.clone(),
        created_at,
        status: STATUS_PROVISIONING,
        vault: serde_json::Map::new(),
    };
    let mut config_json = serde_json::to_string_pretty(&config)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize environment config: {e}")))?;
    config_json.push('\n');

    // Slugs may start with a digit; the prefix keeps keys valid identifiers.
    let key = format!("ENV_{}", slug.to_uppercase().replace('-', "_"));
    let env_example = format!(
        "# Environment variables for {slug}\n\
         ENVIRONMENT={slug}\n\
         {key}_API_URL=\n\
         {key}_DATABASE_URL=\n"
    );

    Ok(vec![
        EnvironmentFile {
            path: format!("{ENV_DIR}/{slug}/README.md"),
            content: readme,
        },
        EnvironmentFile {
            path: config_path(slug),
            content: config_json,
        },
        EnvironmentFile {
            path: format!("{ENV_DIR}/{slug}/.env.example"),
            content: env_example,
        },
    ])
}

/// Human-readable notification for a newly provisioned environment.
pub fn issue_comment(slug: &str) -> String {
    let branch = branch_name(slug);
    format!(
        "Environment branch `{branch}` created. Configuration: `{}`. Status: {STATUS_PROVISIONING}.",
        config_path(slug)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
