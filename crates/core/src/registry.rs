//! Registry of provisioned units.
//!
//! The registry is a single ordered collection serialized as one JSON value
//! in a repository's variable store. This module owns the data model and
//! the in-memory merge rules; reading and writing the variable is done by
//! `repodeck_control::registry`.
//!
//! Invariant: at most one entry per `(owner, repo_name)` key. [`RegistryCollection::upsert`]
//! replaces in place or appends, never duplicates.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::templates::RepoTemplate;
use crate::types::Timestamp;

/// Name of the variable holding the serialized collection.
pub const REGISTRY_VARIABLE: &str = "REPODECK_REGISTRY";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryStatus {
    Provisioning,
    Active,
    Archived,
}

impl RegistryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// Result of [`RegistryCollection::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "index")]
pub enum UpsertOutcome {
    Replaced(usize),
    Appended(usize),
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// One provisioned unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub repo_name: String,
    pub owner: String,
    pub template_name: String,
    pub template_version: String,
    pub deploy_target: String,
    pub required_config: Vec<String>,
    pub status: RegistryStatus,
    pub upgrade_path: Option<String>,
    pub created_at: Timestamp,
}

impl RegistryEntry {
    /// Build an `active` entry for a repository scaffolded from `template`.
    ///
    /// Template identity and version are copied so later catalog edits do
    /// not change what this entry records.
    pub fn from_template(
        owner: &str,
        repo_name: &str,
        template: &RepoTemplate,
        created_at: Timestamp,
    ) -> Self {
        Self {
            repo_name: repo_name.to_string(),
            owner: owner.to_string(),
            template_name: template.name.clone(),
            template_version: template.version.clone(),
            deploy_target: template.deploy_target.clone(),
            required_config: template.secrets.clone(),
            status: RegistryStatus::Active,
            upgrade_path: None,
            created_at,
        }
    }

    pub fn matches(&self, owner: &str, repo_name: &str) -> bool {
        self.owner == owner && self.repo_name == repo_name
    }
}

/// Ordered collection of registry entries, serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryCollection {
    entries: Vec<RegistryEntry>,
}

impl RegistryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RegistryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, owner: &str, repo_name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.matches(owner, repo_name))
    }

    /// Replace the entry with the same key, or append if there is none.
    pub fn upsert(&mut self, entry: RegistryEntry) -> UpsertOutcome {
        match self
            .entries
            .iter()
            .position(|e| e.matches(&entry.owner, &entry.repo_name))
        {
            Some(index) => {
                self.entries[index] = entry;
                UpsertOutcome::Replaced(index)
            }
            None => {
                self.entries.push(entry);
                UpsertOutcome::Appended(self.entries.len() - 1)
            }
        }
    }

    /// Mark the entry for `(owner, repo_name)` as archived.
    ///
    /// Only `status` changes. Archiving an already archived entry is a
    /// no-op that still succeeds.
    pub fn archive(&mut self, owner: &str, repo_name: &str) -> Result<&RegistryEntry, CoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.matches(owner, repo_name))
            .ok_or_else(|| CoreError::NotFound {
                entity: "RegistryEntry",
                key: format!("{owner}/{repo_name}"),
            })?;
        entry.status = RegistryStatus::Archived;
        Ok(entry)
    }

    /// Parse a stored value.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Vec<RegistryEntry>> for RegistryCollection {
    fn from(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
