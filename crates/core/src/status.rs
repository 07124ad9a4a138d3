//! Governance status inference.
//!
//! Derives a repository's maturity tier and deployment stage from its raw
//! attributes (archived flag, topic labels, star/fork counts, last push).
//! Both derivations are first-match-wins cascades; the order of the rules
//! is the tie-break, so a repo tagged `archived` and `production` is
//! ARCHIVED, not CORE.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A push older than this is not reported as a deployment.
pub const DEPLOY_FRESHNESS_DAYS: i64 = 90;

/// Star count at which an untagged repo is considered CORE.
pub const CORE_STAR_THRESHOLD: u64 = 5;

/// Fork count at which an untagged repo is considered CORE.
pub const CORE_FORK_THRESHOLD: u64 = 2;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Governance maturity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Core,
    Pilot,
    Draft,
    Archived,
    Experimental,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "CORE",
            Self::Pilot => "PILOT",
            Self::Draft => "DRAFT",
            Self::Archived => "ARCHIVED",
            Self::Experimental => "EXPERIMENTAL",
        }
    }
}

/// Inferred deployment stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Production,
    Staging,
    Local,
    None,
}

impl DeploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "PRODUCTION",
            Self::Staging => "STAGING",
            Self::Local => "LOCAL",
            Self::None => "NONE",
        }
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// The raw repository attributes the inference reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSnapshot {
    pub owner: String,
    pub name: String,
    pub archived: bool,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub pushed_at: Option<Timestamp>,
}

/// Derived governance status. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatusMeta {
    pub tier: Tier,
    pub deployment_status: DeploymentStatus,
    pub last_deploy_at: Option<Timestamp>,
    #[serde(rename = "openPRCount")]
    pub open_pr_count: u64,
    pub open_issue_count: u64,
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Infer governance status as of `now`.
///
/// Total and deterministic for a given `(repo, now)`. `open_pr_count` is
/// always 0: the snapshot carries no pull-request data.
pub fn infer_status(repo: &RepoSnapshot, now: Timestamp) -> RepoStatusMeta {
    let topics: Vec<String> = repo.topics.iter().map(|t| t.to_lowercase()).collect();
    let has = |names: &[&str]| topics.iter().any(|t| names.contains(&t.as_str()));

    let tier = infer_tier(repo, &has);
    let deployment_status = infer_deployment(tier, &has);

    let last_deploy_at = match (deployment_status, repo.pushed_at) {
        (DeploymentStatus::None, _) | (_, None) => None,
        (_, Some(pushed_at)) => {
            let fresh = now - pushed_at < chrono::Duration::days(DEPLOY_FRESHNESS_DAYS);
            fresh.then_some(pushed_at)
        }
    };

    RepoStatusMeta {
        tier,
        deployment_status,
        last_deploy_at,
        open_pr_count: 0,
        open_issue_count: repo.open_issues_count,
    }
}

/// [`infer_status`] against the current wall clock.
pub fn infer_status_now(repo: &RepoSnapshot) -> RepoStatusMeta {
    infer_status(repo, chrono::Utc::now())
}

fn infer_tier(repo: &RepoSnapshot, has: &impl Fn(&[&str]) -> bool) -> Tier {
    if repo.archived || has(&["archived"]) {
        Tier::Archived
    } else if has(&["core", "production"]) {
        Tier::Core
    } else if has(&["pilot", "beta"]) {
        Tier::Pilot
    } else if has(&["experimental", "spike"]) {
        Tier::Experimental
    } else if repo.stargazers_count >= CORE_STAR_THRESHOLD
        || repo.forks_count >= CORE_FORK_THRESHOLD
    {
        Tier::Core
    } else {
        Tier::Draft
    }
}

fn infer_deployment(tier: Tier, has: &impl Fn(&[&str]) -> bool) -> DeploymentStatus {
    if has(&["production", "deployed"]) {
        DeploymentStatus::Production
    } else if has(&["staging", "preview"]) {
        DeploymentStatus::Staging
    } else if has(&["local", "dev"]) {
        DeploymentStatus::Local
    } else if tier == Tier::Core {
        DeploymentStatus::Production
    } else {
        DeploymentStatus::None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
