mod common;

use assert_matches::assert_matches;
use repodeck_control::scaffold::{scaffold_repository, ScaffoldRequest};
use repodeck_control::ControlError;
use repodeck_core::error::CoreError;
use repodeck_core::registry::{RegistryCollection, RegistryStatus, REGISTRY_VARIABLE};
use repodeck_core::templates::{resolve_template, DEFAULT_TEMPLATE_ID};
use repodeck_hosting::memory::{InjectedFailure, Operation};
use repodeck_hosting::{HostingError, MemoryHosting};

use common::OWNER;

#[tokio::test]
async fn scaffold_commits_files_in_order_then_registers() {
    let hosting = MemoryHosting::new(OWNER);
    let mut request = ScaffoldRequest::new("payments", "container-service");
    request.description = "Payment processing".into();

    let outcome = scaffold_repository(&hosting, &request).await.unwrap();

    assert_eq!(outcome.repo.full_name, "acme/payments");
    let paths: Vec<_> = outcome.template.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        ["README.md", "package.json", ".env.example", "Dockerfile", ".dockerignore"]
    );

    let commits: Vec<_> = hosting
        .calls_of(Operation::PutFileContent)
        .into_iter()
        .map(|c| c.target)
        .collect();
    let expected: Vec<_> = paths.iter().map(|p| format!("acme/payments:{p}")).collect();
    assert_eq!(commits, expected);

    for file in &outcome.template.files {
        assert_eq!(
            hosting.file(OWNER, "payments", "main", &file.path).as_deref(),
            Some(file.content.as_str())
        );
    }

    // Registry write is the last mutation.
    let last = hosting.calls().last().cloned().unwrap();
    assert_matches!(last.op, Operation::UpdateVariable | Operation::CreateVariable);
}

#[tokio::test]
async fn scaffold_records_active_entry_in_new_repo() {
    let hosting = MemoryHosting::new(OWNER);
    let request = ScaffoldRequest::new("worker", "python-worker");

    let outcome = scaffold_repository(&hosting, &request).await.unwrap();

    let entry = &outcome.registry_entry;
    assert_eq!(entry.owner, OWNER);
    assert_eq!(entry.repo_name, "worker");
    assert_eq!(entry.template_name, "python-worker");
    assert_eq!(entry.template_version, outcome.template.version);
    assert_eq!(entry.required_config, outcome.template.secrets);
    assert_eq!(entry.status, RegistryStatus::Active);
    assert!(entry.upgrade_path.is_none());

    let raw = hosting.variable(OWNER, "worker", REGISTRY_VARIABLE).unwrap();
    let stored = RegistryCollection::from_json(&raw).unwrap();
    assert_eq!(stored.entries(), std::slice::from_ref(entry));
}

#[tokio::test]
async fn scaffold_returns_deploy_and_verify_commands() {
    let hosting = MemoryHosting::new(OWNER);

    let docker = scaffold_repository(&hosting, &ScaffoldRequest::new("svc", "container-service"))
        .await
        .unwrap();
    assert_eq!(
        docker.deploy_commands,
        ["docker build -t svc .", "docker run -p 3000:3000 svc"]
    );
    assert_eq!(docker.verify_steps.len(), 4);
    assert_eq!(docker.verify_steps[0], "git clone https://github.com/acme/svc.git");

    let vercel = scaffold_repository(&hosting, &ScaffoldRequest::new("web", "serverless-app"))
        .await
        .unwrap();
    assert_eq!(vercel.deploy_commands, ["vercel --prod"]);
}

#[tokio::test]
async fn unknown_template_scaffolds_default() {
    let hosting = MemoryHosting::new(OWNER);

    let outcome = scaffold_repository(&hosting, &ScaffoldRequest::new("svc", "does-not-exist"))
        .await
        .unwrap();

    let default = resolve_template(DEFAULT_TEMPLATE_ID, "svc", "").template;
    assert_eq!(outcome.template, default);
    assert_eq!(outcome.registry_entry.template_name, DEFAULT_TEMPLATE_ID);
}

#[tokio::test]
async fn invalid_name_fails_before_any_call() {
    let hosting = MemoryHosting::new(OWNER);

    let err = scaffold_repository(&hosting, &ScaffoldRequest::new("bad name", "container-service"))
        .await
        .unwrap_err();

    assert_matches!(err, ControlError::Core(CoreError::Validation(_)));
    assert!(hosting.calls().is_empty());
}

#[tokio::test]
async fn create_failure_stops_everything() {
    let hosting = MemoryHosting::new(OWNER);
    hosting.fail_on(Operation::CreateRepository, 1, InjectedFailure::Api(422));

    let err = scaffold_repository(&hosting, &ScaffoldRequest::new("svc", "container-service"))
        .await
        .unwrap_err();

    assert_matches!(err, ControlError::Hosting(HostingError::Api { status: 422, .. }));
    assert_eq!(hosting.calls().len(), 1);
    assert!(!hosting.has_repository(OWNER, "svc"));
}

#[tokio::test]
async fn file_failure_leaves_repo_and_earlier_files_without_registry() {
    let hosting = MemoryHosting::new(OWNER);
    hosting.fail_on(Operation::PutFileContent, 3, InjectedFailure::Api(502));

    let err = scaffold_repository(&hosting, &ScaffoldRequest::new("svc", "container-service"))
        .await
        .unwrap_err();

    assert_matches!(err, ControlError::Hosting(HostingError::Api { status: 502, .. }));
    assert!(hosting.has_repository(OWNER, "svc"));
    assert_eq!(hosting.file_paths(OWNER, "svc", "main"), ["README.md", "package.json"]);
    assert_eq!(hosting.calls_of(Operation::PutFileContent).len(), 3);
    assert!(hosting.variable(OWNER, "svc", REGISTRY_VARIABLE).is_none());
    assert!(hosting.calls_of(Operation::GetVariable).is_empty());
}

#[tokio::test]
async fn registry_failure_keeps_committed_files() {
    let hosting = MemoryHosting::new(OWNER);
    hosting.fail_on(Operation::CreateVariable, 1, InjectedFailure::Unauthorized);

    let err = scaffold_repository(&hosting, &ScaffoldRequest::new("svc", "serverless-app"))
        .await
        .unwrap_err();

    assert_matches!(err, ControlError::Hosting(HostingError::Unauthorized { .. }));
    assert_eq!(hosting.file_paths(OWNER, "svc", "main").len(), 4);
    assert!(hosting.variable(OWNER, "svc", REGISTRY_VARIABLE).is_none());
}

#[tokio::test]
async fn scaffolding_same_name_twice_fails_on_create() {
    let hosting = MemoryHosting::new(OWNER);
    let request = ScaffoldRequest::new("svc", "container-service");
    scaffold_repository(&hosting, &request).await.unwrap();

    let err = scaffold_repository(&hosting, &request).await.unwrap_err();

    assert_matches!(err, ControlError::Hosting(HostingError::Api { status: 422, .. }));
}
