//! Registry persistence in a repository variable.
//!
//! The whole [`RegistryCollection`] is stored as one JSON value under
//! [`REGISTRY_VARIABLE`] in the variable store of the repository named by
//! `ctx`. Every mutation is read-modify-write of the entire collection with
//! no concurrency token, so concurrent writers race and the last one wins.

use repodeck_core::registry::{RegistryCollection, RegistryEntry, UpsertOutcome, REGISTRY_VARIABLE};
use repodeck_core::types::RepoRef;
use repodeck_hosting::{HostingError, HostingPlatform};
use serde::Serialize;

use crate::error::ControlError;

/// Where a loaded collection came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum RegistrySource {
    /// The variable does not exist yet.
    Missing,
    Stored,
    /// The variable exists but does not parse. Treated as empty.
    Corrupt(String),
}

#[derive(Debug, Clone)]
pub struct RegistryLoad {
    pub collection: RegistryCollection,
    pub source: RegistrySource,
}

/// Read the registry stored in `ctx`.
///
/// A missing variable and an unparseable value both yield an empty
/// collection; `source` tells them apart. Any other hosting failure
/// propagates.
pub async fn load_registry(
    platform: &dyn HostingPlatform,
    ctx: &RepoRef,
) -> Result<RegistryLoad, ControlError> {
    let raw = match platform
        .get_variable(&ctx.owner, &ctx.repo, REGISTRY_VARIABLE)
        .await
    {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => {
            tracing::debug!(owner = %ctx.owner, repo = %ctx.repo, "Registry variable not present");
            return Ok(RegistryLoad {
                collection: RegistryCollection::new(),
                source: RegistrySource::Missing,
            });
        }
        Err(e) => return Err(e.into()),
    };

    match RegistryCollection::from_json(&raw) {
        Ok(collection) => {
            tracing::debug!(
                owner = %ctx.owner,
                repo = %ctx.repo,
                entries = collection.len(),
                "Registry loaded",
            );
            Ok(RegistryLoad {
                collection,
                source: RegistrySource::Stored,
            })
        }
        Err(e) => {
            tracing::warn!(
                owner = %ctx.owner,
                repo = %ctx.repo,
                error = %e,
                "Registry variable is corrupt, treating as empty",
            );
            Ok(RegistryLoad {
                collection: RegistryCollection::new(),
                source: RegistrySource::Corrupt(e.to_string()),
            })
        }
    }
}

/// The stored collection, empty when absent or corrupt.
pub async fn fetch_registry(
    platform: &dyn HostingPlatform,
    ctx: &RepoRef,
) -> Result<RegistryCollection, ControlError> {
    Ok(load_registry(platform, ctx).await?.collection)
}

/// Insert or replace `entry` (keyed by owner and repo name) and persist.
pub async fn save_registry_entry(
    platform: &dyn HostingPlatform,
    ctx: &RepoRef,
    entry: RegistryEntry,
) -> Result<UpsertOutcome, ControlError> {
    let mut collection = fetch_registry(platform, ctx).await?;
    let key = format!("{}/{}", entry.owner, entry.repo_name);
    let outcome = collection.upsert(entry);

    write_variable(platform, ctx, REGISTRY_VARIABLE, &collection.to_json()?).await?;

    tracing::info!(
        owner = %ctx.owner,
        repo = %ctx.repo,
        entry = %key,
        outcome = ?outcome,
        entries = collection.len(),
        "Registry entry saved",
    );
    Ok(outcome)
}

/// Set the status of an existing entry to `archived` and persist.
///
/// Fails with `NotFound` before any write when the key is absent.
pub async fn archive_registry_entry(
    platform: &dyn HostingPlatform,
    ctx: &RepoRef,
    owner: &str,
    repo_name: &str,
) -> Result<RegistryEntry, ControlError> {
    let mut collection = fetch_registry(platform, ctx).await?;
    let archived = collection.archive(owner, repo_name)?.clone();

    write_variable(platform, ctx, REGISTRY_VARIABLE, &collection.to_json()?).await?;

    tracing::info!(
        owner = %ctx.owner,
        repo = %ctx.repo,
        entry = %format!("{owner}/{repo_name}"),
        "Registry entry archived",
    );
    Ok(archived)
}

/// Update `name`, creating it when the platform reports it missing.
///
/// Only a `NotFound` from the update triggers the create; every other
/// error is returned unchanged.
pub async fn write_variable(
    platform: &dyn HostingPlatform,
    ctx: &RepoRef,
    name: &str,
    value: &str,
) -> Result<(), HostingError> {
    match platform.update_variable(&ctx.owner, &ctx.repo, name, value).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            tracing::debug!(owner = %ctx.owner, repo = %ctx.repo, variable = name, "Variable missing, creating");
            platform.create_variable(&ctx.owner, &ctx.repo, name, value).await
        }
        Err(e) => Err(e),
    }
}
