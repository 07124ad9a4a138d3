mod common;

use assert_matches::assert_matches;
use repodeck_control::registry::{
    archive_registry_entry, fetch_registry, load_registry, save_registry_entry, write_variable,
    RegistrySource,
};
use repodeck_control::ControlError;
use repodeck_core::error::CoreError;
use repodeck_core::registry::{RegistryCollection, RegistryStatus, UpsertOutcome, REGISTRY_VARIABLE};
use repodeck_hosting::memory::{InjectedFailure, Operation};
use repodeck_hosting::HostingError;

use common::{ctx, entry, hosting, OWNER, REPO};

fn stored(hosting: &repodeck_hosting::MemoryHosting) -> RegistryCollection {
    let raw = hosting
        .variable(OWNER, REPO, REGISTRY_VARIABLE)
        .expect("registry variable should exist");
    RegistryCollection::from_json(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_variable_loads_empty() {
    let hosting = hosting();
    let load = load_registry(&hosting, &ctx()).await.unwrap();
    assert!(load.collection.is_empty());
    assert_eq!(load.source, RegistrySource::Missing);
}

#[tokio::test]
async fn corrupt_variable_loads_empty() {
    let hosting = hosting();
    hosting.seed_variable(OWNER, REPO, REGISTRY_VARIABLE, "{not json");

    let load = load_registry(&hosting, &ctx()).await.unwrap();
    assert!(load.collection.is_empty());
    assert_matches!(load.source, RegistrySource::Corrupt(_));
}

#[tokio::test]
async fn stored_variable_round_trips() {
    let hosting = hosting();
    let collection = RegistryCollection::from(vec![entry("acme", "a"), entry("acme", "b")]);
    hosting.seed_variable(OWNER, REPO, REGISTRY_VARIABLE, &collection.to_json().unwrap());

    let load = load_registry(&hosting, &ctx()).await.unwrap();
    assert_eq!(load.source, RegistrySource::Stored);
    assert_eq!(load.collection, collection);
}

#[tokio::test]
async fn other_read_errors_propagate() {
    let hosting = hosting();
    hosting.fail_on(Operation::GetVariable, 1, InjectedFailure::Unauthorized);

    let err = fetch_registry(&hosting, &ctx()).await.unwrap_err();
    assert_matches!(err, ControlError::Hosting(HostingError::Unauthorized { .. }));
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_save_creates_variable() {
    let hosting = hosting();

    let outcome = save_registry_entry(&hosting, &ctx(), entry("acme", "a")).await.unwrap();

    assert_eq!(outcome, UpsertOutcome::Appended(0));
    assert_eq!(hosting.calls_of(Operation::UpdateVariable).len(), 1);
    assert_eq!(hosting.calls_of(Operation::CreateVariable).len(), 1);
    assert_eq!(stored(&hosting).len(), 1);
}

#[tokio::test]
async fn save_existing_key_replaces_in_place() {
    let hosting = hosting();
    save_registry_entry(&hosting, &ctx(), entry("acme", "a")).await.unwrap();
    save_registry_entry(&hosting, &ctx(), entry("acme", "b")).await.unwrap();

    let mut updated = entry("acme", "a");
    updated.template_version = "2.0.0".into();
    let outcome = save_registry_entry(&hosting, &ctx(), updated).await.unwrap();

    assert_eq!(outcome, UpsertOutcome::Replaced(0));
    let collection = stored(&hosting);
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.entries()[0].template_version, "2.0.0");
    assert_eq!(collection.entries()[1].repo_name, "b");
    // Only the first save had to create the variable.
    assert_eq!(hosting.calls_of(Operation::CreateVariable).len(), 1);
}

#[tokio::test]
async fn save_new_key_appends() {
    let hosting = hosting();
    save_registry_entry(&hosting, &ctx(), entry("acme", "a")).await.unwrap();

    let outcome = save_registry_entry(&hosting, &ctx(), entry("other", "a")).await.unwrap();

    assert_eq!(outcome, UpsertOutcome::Appended(1));
    assert_eq!(stored(&hosting).len(), 2);
}

#[tokio::test]
async fn save_over_corrupt_value_starts_fresh() {
    let hosting = hosting();
    hosting.seed_variable(OWNER, REPO, REGISTRY_VARIABLE, "[{\"broken\":");

    save_registry_entry(&hosting, &ctx(), entry("acme", "a")).await.unwrap();

    assert_eq!(stored(&hosting).len(), 1);
    assert!(hosting.calls_of(Operation::CreateVariable).is_empty());
}

// ---------------------------------------------------------------------------
// write_variable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn write_variable_does_not_create_on_other_errors() {
    let hosting = hosting();
    hosting.fail_on(Operation::UpdateVariable, 1, InjectedFailure::Api(500));

    let err = write_variable(&hosting, &ctx(), "X", "1").await.unwrap_err();

    assert_matches!(err, HostingError::Api { status: 500, .. });
    assert!(hosting.calls_of(Operation::CreateVariable).is_empty());
    assert!(hosting.variable(OWNER, REPO, "X").is_none());
}

#[tokio::test]
async fn write_variable_updates_existing() {
    let hosting = hosting();
    hosting.seed_variable(OWNER, REPO, "X", "old");

    write_variable(&hosting, &ctx(), "X", "new").await.unwrap();

    assert_eq!(hosting.variable(OWNER, REPO, "X").as_deref(), Some("new"));
    assert!(hosting.calls_of(Operation::CreateVariable).is_empty());
}

// ---------------------------------------------------------------------------
// Archiving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn archive_missing_entry_is_not_found_without_write() {
    let hosting = hosting();
    save_registry_entry(&hosting, &ctx(), entry("acme", "a")).await.unwrap();
    let writes_before = hosting.calls_of(Operation::UpdateVariable).len();

    let err = archive_registry_entry(&hosting, &ctx(), "acme", "ghost")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_matches!(
        err,
        ControlError::Core(CoreError::NotFound { entity: "RegistryEntry", ref key }) if key == "acme/ghost"
    );
    assert_eq!(hosting.calls_of(Operation::UpdateVariable).len(), writes_before);
}

#[tokio::test]
async fn archive_changes_only_status() {
    let hosting = hosting();
    save_registry_entry(&hosting, &ctx(), entry("acme", "a")).await.unwrap();
    save_registry_entry(&hosting, &ctx(), entry("acme", "b")).await.unwrap();

    let archived = archive_registry_entry(&hosting, &ctx(), "acme", "b").await.unwrap();

    let mut expected = entry("acme", "b");
    expected.status = RegistryStatus::Archived;
    assert_eq!(archived, expected);

    let collection = stored(&hosting);
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.entries()[0], entry("acme", "a"));
    assert_eq!(collection.entries()[1], expected);
}
