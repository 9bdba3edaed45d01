//! Integration tests for the directory-backed tenant store

use compendium::adapters::filestore::FileStore;
use compendium::adapters::traits::{
    Application, ApplicationEnumerator, DefinitionResolver, TenantContextProvider,
};
use compendium::core::export::ExportAssembler;
use compendium::core::handler::{ExportAllHandler, HandlerError};
use compendium::domain::{ContextError, DefinitionId, ExportRequest, ResolutionError};
use compendium::notify::TracingNotifier;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_json(path: &Path, value: serde_json::Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

/// Two applications sharing `shared` and the transitive `lookup`
fn seeded_store() -> TempDir {
    let root = TempDir::new().unwrap();
    let tenant = root.path().join("acme");

    write_json(
        &tenant.join("applications/app-a.json"),
        json!({"id": "app-a", "name": "App A", "definitions": ["form-1", "shared"]}),
    );
    write_json(
        &tenant.join("applications/app-b.json"),
        json!({"id": "app-b", "definitions": ["shared", "form-2"]}),
    );
    write_json(
        &tenant.join("definitions/form-1.json"),
        json!({"id": "form-1", "title": "Intake", "dependsOn": ["lookup"]}),
    );
    write_json(
        &tenant.join("definitions/shared.json"),
        json!({"id": "shared", "dependsOn": ["lookup"]}),
    );
    write_json(
        &tenant.join("definitions/lookup.json"),
        json!({"id": "lookup", "values": [1, 2, 3]}),
    );
    write_json(&tenant.join("definitions/form-2.json"), json!({"id": "form-2"}));

    root
}

fn id(s: &str) -> DefinitionId {
    DefinitionId::new(s).unwrap()
}

fn handler(root: &Path) -> ExportAllHandler {
    ExportAllHandler::new(
        Arc::new(FileStore::new(root)),
        Arc::new(TracingNotifier::new("compendium-test")),
    )
}

#[tokio::test]
async fn test_export_from_file_store() {
    let root = seeded_store();

    let response = handler(root.path())
        .handle(&ExportRequest::new("acme"))
        .await
        .unwrap();

    let exported: Vec<&str> = response
        .document
        .definitions
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(
        exported,
        vec!["app-a", "form-1", "lookup", "shared", "app-b", "form-2"]
    );

    // Attributes pass through untouched
    let form = &response.document.definitions[1];
    assert_eq!(form.attribute("title"), Some(&json!("Intake")));
    assert_eq!(form.attribute("dependsOn"), Some(&json!(["lookup"])));

    assert_eq!(response.summary.total_applications, 2);
    assert_eq!(response.summary.ids_referenced, 9);
    assert_eq!(response.summary.duplicates_skipped, 3);
}

#[tokio::test]
async fn test_concurrent_export_matches_sequential() {
    let root = seeded_store();

    let sequential = handler(root.path())
        .handle(&ExportRequest::new("acme"))
        .await
        .unwrap();
    let concurrent = handler(root.path())
        .with_assembler(ExportAssembler::new().with_resolve_concurrency(4))
        .handle(&ExportRequest::new("acme"))
        .await
        .unwrap();

    assert_eq!(sequential.document.definitions, concurrent.document.definitions);
    assert_eq!(sequential.summary.checksum, concurrent.summary.checksum);
}

#[tokio::test]
async fn test_applications_are_listed_in_file_name_order() {
    let root = seeded_store();
    let context = FileStore::new(root.path())
        .resolve(&ExportRequest::new("acme"))
        .await
        .unwrap();

    let applications = context.applications().await.unwrap();
    let names: Vec<&str> = applications.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["App A", "app-b"]);

    let ids = applications[0].export_ids().await.unwrap();
    assert_eq!(ids, vec![id("app-a"), id("form-1"), id("lookup"), id("shared"), id("lookup")]);
}

#[tokio::test]
async fn test_unknown_and_invalid_tenants() {
    let root = seeded_store();
    let store = FileStore::new(root.path());

    let missing = store.resolve(&ExportRequest::new("globex")).await.err().unwrap();
    assert!(matches!(missing, ContextError::TenantNotFound(_)));

    let invalid = store.resolve(&ExportRequest::new("../acme")).await.err().unwrap();
    assert!(matches!(invalid, ContextError::InvalidTenant(_)));
}

#[tokio::test]
async fn test_tenant_without_applications_exports_empty_document() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("empty")).unwrap();

    let response = handler(root.path())
        .handle(&ExportRequest::new("empty"))
        .await
        .unwrap();

    assert!(response.document.is_empty());
}

#[tokio::test]
async fn test_missing_referenced_definition_fails_gathering() {
    let root = seeded_store();
    write_json(
        &root.path().join("acme/applications/app-c.json"),
        json!({"id": "app-c", "definitions": ["ghost"]}),
    );

    let err = handler(root.path())
        .handle(&ExportRequest::new("acme"))
        .await
        .unwrap_err();

    assert_eq!(err, HandlerError::GatheringFailed);
}

#[tokio::test]
async fn test_expand_requires_dependencies_to_exist() {
    let root = seeded_store();
    std::fs::remove_file(root.path().join("acme/definitions/lookup.json")).unwrap();

    let context = FileStore::new(root.path())
        .resolve(&ExportRequest::new("acme"))
        .await
        .unwrap();

    // Without expansion the definition itself is enough
    assert!(context.definition_by_id(&id("shared"), false).await.is_ok());

    match context.definition_by_id(&id("shared"), true).await {
        Err(ResolutionError::MissingDependency { id: parent, dependency }) => {
            assert_eq!(parent.as_str(), "shared");
            assert_eq!(dependency.as_str(), "lookup");
        }
        other => panic!("expected missing dependency, got {other:?}"),
    }
}

#[tokio::test]
async fn test_context_reads_each_definition_once() {
    let root = TempDir::new().unwrap();
    let tenant = root.path().join("chain");
    write_json(&tenant.join("definitions/d1.json"), json!({"id": "d1", "dependsOn": ["d2"]}));
    write_json(&tenant.join("definitions/d2.json"), json!({"id": "d2", "dependsOn": ["d3"]}));
    write_json(&tenant.join("definitions/d3.json"), json!({"id": "d3"}));

    let store = FileStore::new(root.path());
    let context = store.resolve(&ExportRequest::new("chain")).await.unwrap();
    assert!(context.definition_by_id(&id("d1"), true).await.is_ok());

    // The closure of d1 was read and verified once; later lookups use it
    std::fs::remove_file(tenant.join("definitions/d3.json")).unwrap();
    assert!(context.definition_by_id(&id("d2"), true).await.is_ok());
    assert!(context.definition_by_id(&id("d3"), true).await.is_ok());

    // A fresh context sees the store as it is now
    let fresh = store.resolve(&ExportRequest::new("chain")).await.unwrap();
    match fresh.definition_by_id(&id("d2"), true).await {
        Err(ResolutionError::MissingDependency { id: parent, dependency }) => {
            assert_eq!(parent.as_str(), "d2");
            assert_eq!(dependency.as_str(), "d3");
        }
        other => panic!("expected missing dependency, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dependency_cycles_terminate() {
    let root = TempDir::new().unwrap();
    let tenant = root.path().join("loop");
    write_json(
        &tenant.join("applications/app.json"),
        json!({"id": "app", "definitions": ["a"]}),
    );
    write_json(&tenant.join("definitions/a.json"), json!({"id": "a", "dependsOn": ["b"]}));
    write_json(&tenant.join("definitions/b.json"), json!({"id": "b", "dependsOn": ["a"]}));

    let response = handler(root.path())
        .handle(&ExportRequest::new("loop"))
        .await
        .unwrap();

    let exported: Vec<&str> = response
        .document
        .definitions
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(exported, vec!["app", "a", "b"]);
}

#[tokio::test]
async fn test_definition_id_mismatch() {
    let root = seeded_store();
    write_json(
        &root.path().join("acme/definitions/form-2.json"),
        json!({"id": "something-else"}),
    );

    let context = FileStore::new(root.path())
        .resolve(&ExportRequest::new("acme"))
        .await
        .unwrap();

    let result = context.definition_by_id(&id("form-2"), true).await;
    assert!(matches!(result, Err(ResolutionError::IdMismatch { .. })));
}

#[tokio::test]
async fn test_path_traversal_ids_are_rejected() {
    let root = seeded_store();
    let context = FileStore::new(root.path())
        .resolve(&ExportRequest::new("acme"))
        .await
        .unwrap();

    let result = context.definition_by_id(&id("../secrets"), false).await;
    assert!(matches!(result, Err(ResolutionError::InvalidId(_))));
}
