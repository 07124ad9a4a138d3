#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use repodeck_core::registry::{RegistryEntry, RegistryStatus};
use repodeck_core::types::RepoRef;
use repodeck_hosting::MemoryHosting;

pub const OWNER: &str = "acme";
pub const REPO: &str = "platform";

/// A platform with one existing repository `acme/platform` on `main`.
pub fn hosting() -> MemoryHosting {
    let hosting = MemoryHosting::new(OWNER);
    hosting.seed_repository(OWNER, REPO, "main");
    hosting
}

pub fn ctx() -> RepoRef {
    RepoRef::new(OWNER, REPO)
}

pub fn entry(owner: &str, repo_name: &str) -> RegistryEntry {
    RegistryEntry {
        repo_name: repo_name.to_string(),
        owner: owner.to_string(),
        template_name: "container-service".to_string(),
        template_version: "1.2.0".to_string(),
        deploy_target: "docker".to_string(),
        required_config: vec!["DATABASE_URL".to_string(), "API_KEY".to_string()],
        status: RegistryStatus::Active,
        upgrade_path: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}
