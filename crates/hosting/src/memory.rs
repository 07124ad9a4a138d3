//! In-memory [`HostingPlatform`] backend.
//!
//! Keeps repositories, branches, files and variables in process memory.
//! Used by the API server's `memory` backend for local development and by
//! tests, which can also inject failures and inspect the recorded call
//! sequence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::HostingError;
use crate::platform::HostingPlatform;
use crate::types::{Branch, CommitResult, FileWrite, GitRef, Repo};

/// Operations recorded by [`MemoryHosting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateRepository,
    GetRepository,
    ListBranches,
    CreateBranch,
    PutFileContent,
    GetVariable,
    UpdateVariable,
    CreateVariable,
}

/// One recorded call: the operation and what it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Operation,
    pub target: String,
}

/// Error to return from an injected failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    NotFound,
    Unauthorized,
    Api(u16),
}

impl InjectedFailure {
    fn to_error(&self, target: &str) -> HostingError {
        match self {
            Self::NotFound => HostingError::not_found(target),
            Self::Unauthorized => HostingError::Unauthorized {
                status: 401,
                body: "Bad credentials".to_string(),
            },
            Self::Api(status) => HostingError::Api {
                status: *status,
                body: "injected failure".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct StoredBranch {
    head: String,
    protected: bool,
    files: BTreeMap<String, (String, String)>,
}

#[derive(Debug, Clone)]
struct StoredRepo {
    repo: Repo,
    branches: BTreeMap<String, StoredBranch>,
    variables: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct State {
    repos: BTreeMap<(String, String), StoredRepo>,
    calls: Vec<Call>,
    call_counts: HashMap<Operation, usize>,
    failures: Vec<(Operation, usize, InjectedFailure)>,
    sha_counter: u64,
}

impl State {
    fn next_sha(&mut self) -> String {
        self.sha_counter += 1;
        format!("{:040x}", self.sha_counter)
    }

    /// Record the call, then return an injected error if one is armed for
    /// this (operation, call number).
    fn record(&mut self, op: Operation, target: String) -> Result<(), HostingError> {
        let count = self.call_counts.entry(op).or_insert(0);
        *count += 1;
        let nth = *count;

        let failure = self
            .failures
            .iter()
            .position(|(o, n, _)| *o == op && *n == nth)
            .map(|i| self.failures.remove(i).2);

        self.calls.push(Call {
            op,
            target: target.clone(),
        });

        match failure {
            Some(f) => Err(f.to_error(&target)),
            None => Ok(()),
        }
    }

    fn repo_mut(&mut self, owner: &str, repo: &str) -> Result<&mut StoredRepo, HostingError> {
        self.repos
            .get_mut(&(owner.to_string(), repo.to_string()))
            .ok_or_else(|| HostingError::not_found(format!("repository {owner}/{repo}")))
    }
}

/// Process-local hosting platform.
pub struct MemoryHosting {
    login: String,
    state: Mutex<State>,
}

impl MemoryHosting {
    /// Create an empty platform where `login` is the authenticated user
    /// that owns newly created repositories.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ---- seeding ----

    /// Add an existing repository with a single branch `default_branch`.
    pub fn seed_repository(&self, owner: &str, name: &str, default_branch: &str) -> Repo {
        let mut state = self.state();
        let head = state.next_sha();
        let repo = new_repo(owner, name, "", true, default_branch);

        let mut branches = BTreeMap::new();
        branches.insert(
            default_branch.to_string(),
            StoredBranch {
                head,
                protected: true,
                files: BTreeMap::new(),
            },
        );

        state.repos.insert(
            (owner.to_string(), name.to_string()),
            StoredRepo {
                repo: repo.clone(),
                branches,
                variables: BTreeMap::new(),
            },
        );
        repo
    }

    /// Overwrite the attributes of a seeded repository (topics, counts...).
    pub fn update_repository(&self, owner: &str, name: &str, update: impl FnOnce(&mut Repo)) {
        let mut state = self.state();
        if let Some(stored) = state.repos.get_mut(&(owner.to_string(), name.to_string())) {
            update(&mut stored.repo);
        }
    }

    /// Store a raw variable value without recording a call.
    pub fn seed_variable(&self, owner: &str, repo: &str, name: &str, value: &str) {
        let mut state = self.state();
        if let Some(stored) = state.repos.get_mut(&(owner.to_string(), repo.to_string())) {
            stored.variables.insert(name.to_string(), value.to_string());
        }
    }

    // ---- failure injection ----

    /// Make the `nth` (1-based) call of `op` fail with `failure`.
    pub fn fail_on(&self, op: Operation, nth: usize, failure: InjectedFailure) {
        self.state().failures.push((op, nth, failure));
    }

    // ---- inspection ----

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn calls_of(&self, op: Operation) -> Vec<Call> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    pub fn variable(&self, owner: &str, repo: &str, name: &str) -> Option<String> {
        self.state()
            .repos
            .get(&(owner.to_string(), repo.to_string()))
            .and_then(|r| r.variables.get(name).cloned())
    }

    pub fn branch_names(&self, owner: &str, repo: &str) -> Vec<String> {
        self.state()
            .repos
            .get(&(owner.to_string(), repo.to_string()))
            .map(|r| r.branches.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Content of `path` on `branch`, if committed.
    pub fn file(&self, owner: &str, repo: &str, branch: &str, path: &str) -> Option<String> {
        self.state()
            .repos
            .get(&(owner.to_string(), repo.to_string()))
            .and_then(|r| r.branches.get(branch))
            .and_then(|b| b.files.get(path))
            .map(|(content, _)| content.clone())
    }

    /// Paths committed to `branch`, sorted.
    pub fn file_paths(&self, owner: &str, repo: &str, branch: &str) -> Vec<String> {
        self.state()
            .repos
            .get(&(owner.to_string(), repo.to_string()))
            .and_then(|r| r.branches.get(branch))
            .map(|b| b.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_repository(&self, owner: &str, repo: &str) -> bool {
        self.state()
            .repos
            .contains_key(&(owner.to_string(), repo.to_string()))
    }
}

fn new_repo(owner: &str, name: &str, description: &str, private: bool, default_branch: &str) -> Repo {
    Repo {
        owner: owner.to_string(),
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        description: (!description.is_empty()).then(|| description.to_string()),
        private,
        archived: false,
        default_branch: default_branch.to_string(),
        html_url: format!("https://github.com/{owner}/{name}"),
        topics: Vec::new(),
        stargazers_count: 0,
        forks_count: 0,
        open_issues_count: 0,
        pushed_at: None,
    }
}

#[async_trait]
impl HostingPlatform for MemoryHosting {
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<Repo, HostingError> {
        let mut state = self.state();
        state.record(Operation::CreateRepository, format!("{}/{name}", self.login))?;

        let key = (self.login.clone(), name.to_string());
        if state.repos.contains_key(&key) {
            return Err(HostingError::Api {
                status: 422,
                body: "name already exists on this account".to_string(),
            });
        }

        let repo = new_repo(&self.login, name, description, private, "main");
        state.repos.insert(
            key,
            StoredRepo {
                repo: repo.clone(),
                branches: BTreeMap::new(),
                variables: BTreeMap::new(),
            },
        );
        Ok(repo)
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repo, HostingError> {
        let mut state = self.state();
        state.record(Operation::GetRepository, format!("{owner}/{repo}"))?;
        Ok(state.repo_mut(owner, repo)?.repo.clone())
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, HostingError> {
        let mut state = self.state();
        state.record(Operation::ListBranches, format!("{owner}/{repo}"))?;
        let stored = state.repo_mut(owner, repo)?;
        Ok(stored
            .branches
            .iter()
            .map(|(name, b)| Branch {
                name: name.clone(),
                head_commit_sha: b.head.clone(),
                protected: b.protected,
            })
            .collect())
    }

    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        from_sha: &str,
    ) -> Result<GitRef, HostingError> {
        let mut state = self.state();
        state.record(Operation::CreateBranch, format!("{owner}/{repo}:{name}"))?;
        let stored = state.repo_mut(owner, repo)?;

        if stored.branches.contains_key(name) {
            return Err(HostingError::Api {
                status: 422,
                body: "Reference already exists".to_string(),
            });
        }
        let source = stored
            .branches
            .values()
            .find(|b| b.head == from_sha)
            .cloned()
            .ok_or_else(|| HostingError::Api {
                status: 422,
                body: "Object does not exist".to_string(),
            })?;

        stored.branches.insert(
            name.to_string(),
            StoredBranch {
                head: from_sha.to_string(),
                protected: false,
                files: source.files,
            },
        );
        Ok(GitRef {
            ref_name: format!("refs/heads/{name}"),
            sha: from_sha.to_string(),
        })
    }

    async fn put_file_content(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> Result<CommitResult, HostingError> {
        let mut state = self.state();
        state.record(
            Operation::PutFileContent,
            format!("{owner}/{repo}:{}", write.path),
        )?;
        let content_sha = state.next_sha();
        let commit_sha = state.next_sha();
        let stored = state.repo_mut(owner, repo)?;

        let branch_name = write
            .branch
            .clone()
            .unwrap_or_else(|| stored.repo.default_branch.clone());

        // An empty repository gets its default branch from the first commit.
        if write.branch.is_none() && !stored.branches.contains_key(&branch_name) {
            stored.branches.insert(
                branch_name.clone(),
                StoredBranch {
                    head: String::new(),
                    protected: false,
                    files: BTreeMap::new(),
                },
            );
        }

        let branch = stored
            .branches
            .get_mut(&branch_name)
            .ok_or_else(|| HostingError::not_found(format!("branch {owner}/{repo}:{branch_name}")))?;

        match (branch.files.get(&write.path), &write.previous_sha) {
            (Some(_), None) => {
                return Err(HostingError::Api {
                    status: 422,
                    body: "\"sha\" wasn't supplied.".to_string(),
                })
            }
            (Some((_, existing)), Some(previous)) if existing != previous => {
                return Err(HostingError::Api {
                    status: 409,
                    body: format!("{} does not match {previous}", write.path),
                })
            }
            (None, Some(_)) => {
                return Err(HostingError::not_found(format!(
                    "contents {owner}/{repo}:{}",
                    write.path
                )))
            }
            _ => {}
        }

        branch
            .files
            .insert(write.path.clone(), (write.content.clone(), content_sha.clone()));
        branch.head = commit_sha.clone();
        stored.repo.pushed_at = Some(Utc::now());

        Ok(CommitResult {
            path: write.path.clone(),
            content_sha,
            commit_sha,
        })
    }

    async fn get_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<String, HostingError> {
        let mut state = self.state();
        let target = format!("variable {owner}/{repo}:{name}");
        state.record(Operation::GetVariable, target.clone())?;
        state
            .repo_mut(owner, repo)?
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| HostingError::not_found(target))
    }

    async fn update_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostingError> {
        let mut state = self.state();
        let target = format!("variable {owner}/{repo}:{name}");
        state.record(Operation::UpdateVariable, target.clone())?;
        match state.repo_mut(owner, repo)?.variables.get_mut(name) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(HostingError::not_found(target)),
        }
    }

    async fn create_variable(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        value: &str,
    ) -> Result<(), HostingError> {
        let mut state = self.state();
        state.record(
            Operation::CreateVariable,
            format!("variable {owner}/{repo}:{name}"),
        )?;
        let stored = state.repo_mut(owner, repo)?;
        if stored.variables.contains_key(name) {
            return Err(HostingError::Api {
                status: 409,
                body: "Already exists".to_string(),
            });
        }
        stored.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
