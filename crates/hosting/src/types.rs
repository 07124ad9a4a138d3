//! Platform-neutral views of hosting resources.

use serde::{Deserialize, Serialize};

use repodeck_core::status::RepoSnapshot;
use repodeck_core::types::{RepoRef, Timestamp};

/// A repository as returned by create/get calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub private: bool,
    pub archived: bool,
    pub default_branch: String,
    pub html_url: String,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub pushed_at: Option<Timestamp>,
}

impl Repo {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.owner, &self.name)
    }

    /// The attributes status inference reads.
    pub fn snapshot(&self) -> RepoSnapshot {
        RepoSnapshot {
            owner: self.owner.clone(),
            name: self.name.clone(),
            archived: self.archived,
            topics: self.topics.clone(),
            stargazers_count: self.stargazers_count,
            forks_count: self.forks_count,
            open_issues_count: self.open_issues_count,
            pushed_at: self.pushed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    pub head_commit_sha: String,
    pub protected: bool,
}

/// A git reference created on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRef {
    pub ref_name: String,
    pub sha: String,
}

/// A create-or-update of one file. Omitting `previous_sha` means create;
/// supplying it updates exactly that version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: String,
    pub content: String,
    pub message: String,
    pub branch: Option<String>,
    pub previous_sha: Option<String>,
}

impl FileWrite {
    pub fn create(path: impl Into<String>, content: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            message: message.into(),
            branch: None,
            previous_sha: None,
        }
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Result of a content commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    pub path: String,
    pub content_sha: String,
    pub commit_sha: String,
}
