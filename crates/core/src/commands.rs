//! Deploy and verify command generation for registry entries.

use crate::registry::RegistryEntry;
use crate::templates::{DEPLOY_TARGET_DOCKER, DEPLOY_TARGET_VERCEL};

/// Port the container templates listen on.
pub const CONTAINER_PORT: u16 = 3000;

/// Shell commands that deploy `entry` to its target, in execution order.
///
/// Targets without automation get a single comment line naming the target.
pub fn deploy_commands(entry: &RegistryEntry) -> Vec<String> {
    let repo = &entry.repo_name;
    match entry.deploy_target.as_str() {
        DEPLOY_TARGET_VERCEL => vec!["vercel --prod".to_string()],
        DEPLOY_TARGET_DOCKER => vec![
            format!("docker build -t {repo} ."),
            format!("docker run -p {CONTAINER_PORT}:{CONTAINER_PORT} {repo}"),
        ],
        other => vec![format!(
            "# deploy manually: no automated deploy for target '{other}'"
        )],
    }
}

/// Steps that check out and build `entry` from scratch. Always four steps,
/// whatever the deploy target.
pub fn verify_steps(entry: &RegistryEntry) -> Vec<String> {
    vec![
        format!(
            "git clone https://github.com/{}/{}.git",
            entry.owner, entry.repo_name
        ),
        format!("cd {}", entry.repo_name),
        "npm install".to_string(),
        "npm run build".to_string(),
    ]
}
