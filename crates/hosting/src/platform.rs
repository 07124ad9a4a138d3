use async_trait::async_trait;

use crate::error::HostingError;
use crate::types::{Branch, CommitResult, FileWrite, GitRef, Repo};

/// Operations the control plane issues against the hosting platform.
///
/// Implementations must report a missing resource as
/// [`HostingError::NotFound`]; the registry's update-then-create fallback
/// and the environment branch precondition depend on it.
#[async_trait]
pub trait HostingPlatform: Send + Sync {
    // ── Repositories ──

    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<Repo, HostingError>;

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repo, HostingError>;

    // ── Branches ──

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, HostingError>;

    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        from_sha: &str,
    ) -> Result<GitRef, HostingError>;

    // ── Contents ──

    async fn put_file_content(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> Result<CommitResult, HostingError>;

    // ── Variables ──

    /// Read a repository variable's value. A missing variable is `NotFound`.
    async fn get_variable(&self, owner: &str, repo: &str, name: &str)
        -> Result<String, HostingError>;

    /// Overwrite an existing variable. A missing variable is `NotFound`.
    async fn update_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostingError>;

    async fn create_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostingError>;
}
