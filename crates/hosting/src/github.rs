//! GitHub REST v3 implementation of [`HostingPlatform`].
//!
//! Wraps the repository, branch, git-ref, contents, and Actions-variable
//! endpoints using [`reqwest`]. Non-2xx responses are classified into
//! [`HostingError`] variants; a 404 always becomes `NotFound`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;

use repodeck_core::encoding::encode_content;
use repodeck_core::types::Timestamp;

use crate::config::HostingConfig;
use crate::error::HostingError;
use crate::platform::HostingPlatform;
use crate::types::{Branch, CommitResult, FileWrite, GitRef, Repo};

/// Media type GitHub recommends for REST calls.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
/// Pinned REST API version.
const GITHUB_API_VERSION: &str = "2022-11-28";
/// Page size for list endpoints (GitHub maximum).
const PAGE_SIZE: usize = 100;

/// HTTP client for the GitHub REST API.
pub struct GitHubApi {
    client: reqwest::Client,
    config: HostingConfig,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GhOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhRepo {
    name: String,
    full_name: String,
    owner: GhOwner,
    description: Option<String>,
    private: bool,
    #[serde(default)]
    archived: bool,
    default_branch: Option<String>,
    html_url: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    pushed_at: Option<Timestamp>,
}

impl From<GhRepo> for Repo {
    fn from(r: GhRepo) -> Self {
        Self {
            owner: r.owner.login,
            name: r.name,
            full_name: r.full_name,
            description: r.description,
            private: r.private,
            archived: r.archived,
            default_branch: r.default_branch.unwrap_or_else(|| "main".to_string()),
            html_url: r.html_url,
            topics: r.topics,
            stargazers_count: r.stargazers_count,
            forks_count: r.forks_count,
            open_issues_count: r.open_issues_count,
            pushed_at: r.pushed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GhCommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhBranch {
    name: String,
    commit: GhCommitRef,
    #[serde(default)]
    protected: bool,
}

#[derive(Debug, Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    ref_name: String,
    object: GhCommitRef,
}

#[derive(Debug, Deserialize)]
struct GhContent {
    path: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhContentResponse {
    content: Option<GhContent>,
    commit: GhCommitRef,
}

#[derive(Debug, Deserialize)]
struct GhVariable {
    value: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GitHubApi {
    /// Build a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: HostingConfig) -> Result<Self, HostingError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: HostingConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &HostingConfig {
        &self.config
    }

    // ---- private helpers ----

    /// Build `{api_url}/{segments...}`, percent-encoding each segment.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, HostingError> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| HostingError::InvalidUrl(format!("{}: {e}", self.config.api_url)))?;
        url.path_segments_mut()
            .map_err(|_| HostingError::InvalidUrl(self.config.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint<'a>(
        &self,
        owner: &'a str,
        repo: &'a str,
        rest: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, HostingError> {
        self.endpoint(["repos", owner, repo].into_iter().chain(rest))
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(USER_AGENT, &self.config.user_agent)
    }

    /// Ensure the response has a success status code, classifying failures.
    async fn ensure_success(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response, HostingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(classify_failure(status, resource, body))
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T, HostingError> {
        let response = Self::ensure_success(response, resource).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| HostingError::Decode(format!("{resource}: {e}")))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response, resource: &str) -> Result<(), HostingError> {
        Self::ensure_success(response, resource).await?;
        Ok(())
    }
}

/// Map a non-2xx status to a [`HostingError`].
fn classify_failure(status: StatusCode, resource: &str, body: String) -> HostingError {
    match status {
        StatusCode::NOT_FOUND => HostingError::not_found(resource),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HostingError::Unauthorized {
            status: status.as_u16(),
            body,
        },
        _ => HostingError::Api {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl HostingPlatform for GitHubApi {
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<Repo, HostingError> {
        let url = match &self.config.organization {
            Some(org) => self.endpoint(["orgs", org.as_str(), "repos"])?,
            None => self.endpoint(["user", "repos"])?,
        };
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "private": private,
            "auto_init": false,
        });

        let resource = format!("repository {name}");
        let response = self.request(Method::POST, url).json(&body).send().await?;
        let repo: GhRepo = Self::parse_response(response, &resource).await?;

        tracing::debug!(full_name = %repo.full_name, private, "Repository created");
        Ok(repo.into())
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repo, HostingError> {
        let url = self.repo_endpoint(owner, repo, [] as [&str; 0])?;
        let response = self.request(Method::GET, url).send().await?;
        let repo: GhRepo =
            Self::parse_response(response, &format!("repository {owner}/{repo}")).await?;
        Ok(repo.into())
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, HostingError> {
        let resource = format!("branches of {owner}/{repo}");
        let mut branches = Vec::new();
        let mut page = 1usize;

        loop {
            let url = self.repo_endpoint(owner, repo, ["branches"])?;
            let response = self
                .request(Method::GET, url)
                .query(&[("per_page", PAGE_SIZE), ("page", page)])
                .send()
                .await?;
            let batch: Vec<GhBranch> = Self::parse_response(response, &resource).await?;
            let done = batch.len() < PAGE_SIZE;

            branches.extend(batch.into_iter().map(|b| Branch {
                name: b.name,
                head_commit_sha: b.commit.sha,
                protected: b.protected,
            }));

            if done {
                break;
            }
            page += 1;
        }

        tracing::debug!(owner, repo, count = branches.len(), "Listed branches");
        Ok(branches)
    }

    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        from_sha: &str,
    ) -> Result<GitRef, HostingError> {
        let url = self.repo_endpoint(owner, repo, ["git", "refs"])?;
        let body = serde_json::json!({
            "ref": format!("refs/heads/{name}"),
            "sha": from_sha,
        });

        let response = self.request(Method::POST, url).json(&body).send().await?;
        let created: GhRef =
            Self::parse_response(response, &format!("ref {owner}/{repo}:{name}")).await?;

        Ok(GitRef {
            ref_name: created.ref_name,
            sha: created.object.sha,
        })
    }

    async fn put_file_content(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> Result<CommitResult, HostingError> {
        let url = self.repo_endpoint(
            owner,
            repo,
            std::iter::once("contents").chain(write.path.split('/')),
        )?;

        let mut body = serde_json::json!({
            "message": write.message,
            "content": encode_content(&write.content),
        });
        if let Some(branch) = &write.branch {
            body["branch"] = serde_json::Value::String(branch.clone());
        }
        if let Some(sha) = &write.previous_sha {
            body["sha"] = serde_json::Value::String(sha.clone());
        }

        let resource = format!("contents {owner}/{repo}:{}", write.path);
        let response = self.request(Method::PUT, url).json(&body).send().await?;
        let result: GhContentResponse = Self::parse_response(response, &resource).await?;

        let content = result
            .content
            .ok_or_else(|| HostingError::Decode(format!("{resource}: missing content")))?;

        Ok(CommitResult {
            path: content.path,
            content_sha: content.sha,
            commit_sha: result.commit.sha,
        })
    }

    async fn get_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<String, HostingError> {
        let url = self.repo_endpoint(owner, repo, ["actions", "variables", name])?;
        let response = self.request(Method::GET, url).send().await?;
        let variable: GhVariable =
            Self::parse_response(response, &format!("variable {owner}/{repo}:{name}")).await?;
        Ok(variable.value)
    }

    async fn update_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostingError> {
        let url = self.repo_endpoint(owner, repo, ["actions", "variables", name])?;
        let body = serde_json::json!({ "name": name, "value": value });
        let response = self.request(Method::PATCH, url).json(&body).send().await?;
        Self::check_status(response, &format!("variable {owner}/{repo}:{name}")).await
    }

    async fn create_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostingError> {
        let url = self.repo_endpoint(owner, repo, ["actions", "variables"])?;
        let body = serde_json::json!({ "name": name, "value": value });
        let response = self.request(Method::POST, url).json(&body).send().await?;
        Self::check_status(response, &format!("variable {owner}/{repo}:{name}")).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
