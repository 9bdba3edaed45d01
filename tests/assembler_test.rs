//! Property tests for export assembly

use async_trait::async_trait;
use compendium::adapters::memory::{MemoryApplication, MemoryTenant};
use compendium::adapters::traits::{Application, DefinitionResolver};
use compendium::core::export::{ExportAssembler, ExportDocument, FORMAT_VERSION};
use compendium::domain::{AssemblyFailure, Definition, DefinitionId, ResolutionError, TenantId};
use std::collections::HashSet;
use std::sync::Arc;
use test_case::test_case;
use tokio::sync::watch;

fn tenant() -> MemoryTenant {
    MemoryTenant::synthesizing(TenantId::new("acme").unwrap())
}

fn apps(list: Vec<MemoryApplication>) -> Vec<Arc<dyn Application>> {
    list.into_iter()
        .map(|app| Arc::new(app) as Arc<dyn Application>)
        .collect()
}

fn app(id: &str, ids: &[&str]) -> MemoryApplication {
    MemoryApplication::from_strs(id, ids)
}

fn ids(document: &ExportDocument) -> Vec<String> {
    document
        .definitions
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}

fn values(document: &ExportDocument) -> Vec<String> {
    document
        .definitions
        .iter()
        .filter_map(|d| d.attribute("value").and_then(|v| v.as_str()).map(String::from))
        .collect()
}

#[tokio::test]
async fn test_two_applications_sharing_an_id() {
    let resolver = tenant();
    let applications = apps(vec![app("A", &["1", "2"]), app("B", &["2", "3"])]);

    let document = ExportAssembler::new()
        .assemble(&applications, &resolver)
        .await
        .unwrap();

    assert_eq!(values(&document), vec!["1-def", "2-def", "3-def"]);
    assert_eq!(document.format_version, "0.0.0");
    assert_eq!(document.format_version, FORMAT_VERSION);
}

#[test_case(1; "sequential")]
#[test_case(4; "concurrent")]
#[tokio::test]
async fn test_every_referenced_id_appears_exactly_once(concurrency: usize) {
    let resolver = tenant();
    let applications = apps(vec![
        app("A", &["x", "y", "x"]),
        app("B", &["y", "z"]),
        app("C", &[]),
        app("D", &["z", "w", "x"]),
    ]);

    let document = ExportAssembler::new()
        .with_resolve_concurrency(concurrency)
        .assemble(&applications, &resolver)
        .await
        .unwrap();

    let exported = ids(&document);
    let distinct: HashSet<_> = exported.iter().cloned().collect();
    assert_eq!(exported.len(), distinct.len(), "no duplicates");
    for id in ["x", "y", "z", "w"] {
        assert!(distinct.contains(id), "{id} missing");
    }
    assert_eq!(exported, vec!["x", "y", "z", "w"]);
    assert_eq!(resolver.resolve_calls(), 4);
}

#[tokio::test]
async fn test_order_is_deterministic() {
    let applications = apps(vec![app("A", &["3", "1"]), app("B", &["2", "1", "4"])]);

    let first = ExportAssembler::new()
        .assemble(&applications, &tenant())
        .await
        .unwrap();
    let second = ExportAssembler::new()
        .assemble(&applications, &tenant())
        .await
        .unwrap();

    assert_eq!(ids(&first), vec!["3", "1", "2", "4"]);
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let applications = apps(vec![
        app("A", &["a", "b", "c", "d"]),
        app("B", &["e", "c", "f"]),
        app("C", &["g", "a", "h"]),
    ]);

    let sequential = ExportAssembler::new()
        .assemble(&applications, &tenant())
        .await
        .unwrap();
    let concurrent = ExportAssembler::new()
        .with_resolve_concurrency(8)
        .assemble(&applications, &tenant())
        .await
        .unwrap();

    assert_eq!(sequential.definitions, concurrent.definitions);
}

#[tokio::test]
async fn test_no_applications_yields_empty_document() {
    let resolver = tenant();

    let document = ExportAssembler::new()
        .assemble(&[], &resolver)
        .await
        .unwrap();

    assert!(document.definitions.is_empty());
    assert_eq!(document.format_version, FORMAT_VERSION);
    assert_eq!(resolver.resolve_calls(), 0);

    let json = serde_json::to_value(&document).unwrap();
    assert_eq!(json["definitions"], serde_json::json!([]));
    assert_eq!(json["date"].as_str().unwrap().len(), 8);
}

#[test_case(1; "sequential")]
#[test_case(4; "concurrent")]
#[tokio::test]
async fn test_resolution_failure_returns_no_document(concurrency: usize) {
    let resolver = tenant().with_failing_definition(DefinitionId::new("2").unwrap());
    let applications = apps(vec![app("A", &["1", "2", "3"]), app("B", &["4", "5"])]);

    let result = ExportAssembler::new()
        .with_resolve_concurrency(concurrency)
        .assemble(&applications, &resolver)
        .await;

    match result {
        Err(AssemblyFailure::Resolution { id, .. }) => assert_eq!(id.as_str(), "2"),
        other => panic!("expected resolution failure, got {other:?}"),
    }
    // Fails fast: nothing after "2" is requested once the failure surfaces
    assert!(resolver.resolve_calls() < 5);
    if concurrency == 1 {
        assert_eq!(resolver.resolve_calls(), 2);
    }
}

#[tokio::test]
async fn test_enumeration_failure_returns_no_document() {
    let resolver = tenant();
    let applications: Vec<Arc<dyn Application>> = vec![
        Arc::new(MemoryApplication::from_strs("A", &["1"])),
        Arc::new(MemoryApplication::from_strs("B", &["2"]).failing()),
    ];

    let result = ExportAssembler::new()
        .assemble(&applications, &resolver)
        .await;

    match result {
        Err(AssemblyFailure::Enumeration { application, .. }) => {
            assert_eq!(application.as_str(), "B")
        }
        other => panic!("expected enumeration failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let (tx, rx) = tokio::sync::watch::channel(false);
    tx.send(true).unwrap();
    let resolver = tenant();
    let applications = apps(vec![app("A", &["1", "2"])]);

    let result = ExportAssembler::new()
        .with_shutdown_signal(rx)
        .assemble(&applications, &resolver)
        .await;

    assert!(matches!(result, Err(AssemblyFailure::Cancelled)));
    assert_eq!(resolver.resolve_calls(), 0);
}

/// Resolver that raises the shutdown signal on its `trigger_at`-th call
struct SignallingResolver {
    inner: MemoryTenant,
    trigger_at: usize,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl DefinitionResolver for SignallingResolver {
    async fn definition_by_id(
        &self,
        id: &DefinitionId,
        expand_dependencies: bool,
    ) -> Result<Definition, ResolutionError> {
        let result = self.inner.definition_by_id(id, expand_dependencies).await;
        if self.inner.resolve_calls() == self.trigger_at {
            self.shutdown.send_replace(true);
        }
        result
    }
}

/// Application that raises the shutdown signal while listing its IDs
struct SignallingApplication {
    inner: MemoryApplication,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl Application for SignallingApplication {
    fn id(&self) -> &DefinitionId {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn export_ids(&self) -> Result<Vec<DefinitionId>, ResolutionError> {
        let ids = self.inner.export_ids().await;
        self.shutdown.send_replace(true);
        ids
    }
}

#[test_case(1; "sequential")]
#[test_case(4; "concurrent")]
#[tokio::test]
async fn test_cancelled_between_resolutions(concurrency: usize) {
    let (tx, rx) = watch::channel(false);
    let resolver = SignallingResolver {
        inner: tenant(),
        trigger_at: 2,
        shutdown: tx,
    };
    let applications = apps(vec![app("A", &["1", "2", "3"]), app("B", &["4", "5", "6"])]);

    let result = ExportAssembler::new()
        .with_resolve_concurrency(concurrency)
        .with_shutdown_signal(rx)
        .assemble(&applications, &resolver)
        .await;

    assert!(matches!(result, Err(AssemblyFailure::Cancelled)), "got {result:?}");
    assert_eq!(resolver.inner.resolve_calls(), 2);
}

#[test_case(1; "sequential")]
#[test_case(4; "concurrent")]
#[tokio::test]
async fn test_cancelled_between_enumerations(concurrency: usize) {
    let (tx, rx) = watch::channel(false);
    let resolver = tenant();
    let applications: Vec<Arc<dyn Application>> = vec![
        Arc::new(SignallingApplication {
            inner: app("A", &["1", "2"]),
            shutdown: tx,
        }),
        Arc::new(app("B", &["3"])),
    ];

    let result = ExportAssembler::new()
        .with_resolve_concurrency(concurrency)
        .with_shutdown_signal(rx)
        .assemble(&applications, &resolver)
        .await;

    assert!(matches!(result, Err(AssemblyFailure::Cancelled)), "got {result:?}");
    assert_eq!(resolver.resolve_calls(), 0);
}
