//! Export assembler - collects, deduplicates and packages definitions
//!
//! Given the applications of a tenant and a resolver, the assembler walks
//! every application's exported IDs, resolves each distinct ID exactly once
//! and emits the definitions in first-reference order.

use crate::adapters::traits::{Application, DefinitionResolver};
use crate::core::export::document::ExportDocument;
use crate::domain::{AssemblyFailure, Definition, DefinitionId};
use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;

/// Counters describing one assembly run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Applications whose IDs were enumerated
    pub applications: usize,

    /// IDs returned by all applications, duplicates included
    pub ids_referenced: usize,

    /// Resolver calls made (equals the number of distinct IDs)
    pub definitions_resolved: usize,

    /// References skipped because the ID was already collected
    pub duplicates_skipped: usize,
}

/// Result of a successful assembly
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: ExportDocument,
    pub stats: AssemblyStats,
}

/// Ordered ID → definition map, iterated in first-insertion order
#[derive(Debug, Default)]
struct CollectedDefinitions {
    order: Vec<DefinitionId>,
    by_id: HashMap<DefinitionId, Definition>,
}

impl CollectedDefinitions {
    fn contains(&self, id: &DefinitionId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Record `definition` under `id`; an existing entry is kept
    fn insert(&mut self, id: DefinitionId, definition: Definition) {
        if self.by_id.contains_key(&id) {
            return;
        }
        self.order.push(id.clone());
        self.by_id.insert(id, definition);
    }

    fn into_definitions(mut self) -> Vec<Definition> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.remove(id))
            .collect()
    }
}

/// Export assembler
///
/// Holds no per-export state; every call to [`assemble`](Self::assemble)
/// starts from an empty collection.
///
/// # Example
///
/// ```rust,no_run
/// use compendium::core::export::ExportAssembler;
/// use compendium::adapters::traits::{ApplicationEnumerator, TenantContextProvider};
/// use compendium::adapters::filestore::FileStore;
/// use compendium::domain::ExportRequest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileStore::new("/var/lib/compendium");
/// let context = store.resolve(&ExportRequest::new("acme")).await?;
/// let applications = context.applications().await?;
///
/// let document = ExportAssembler::new()
///     .assemble(&applications, context.as_ref())
///     .await?;
/// println!("{} definitions", document.definitions.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExportAssembler {
    resolve_concurrency: usize,
    shutdown_signal: Option<watch::Receiver<bool>>,
    export_date: Option<NaiveDate>,
}

impl Default for ExportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportAssembler {
    /// Create a sequential assembler
    pub fn new() -> Self {
        Self {
            resolve_concurrency: 1,
            shutdown_signal: None,
            export_date: None,
        }
    }

    /// Resolve up to `concurrency` definitions at once
    ///
    /// Output order is unaffected. Values below 1 are treated as 1.
    pub fn with_resolve_concurrency(mut self, concurrency: usize) -> Self {
        self.resolve_concurrency = concurrency.max(1);
        self
    }

    /// Abort as soon as the signal turns `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Stamp documents with a fixed date instead of today's
    pub fn with_export_date(mut self, date: NaiveDate) -> Self {
        self.export_date = Some(date);
        self
    }

    /// Configured resolver concurrency
    pub fn resolve_concurrency(&self) -> usize {
        self.resolve_concurrency
    }

    /// Assemble an export document
    ///
    /// # Errors
    ///
    /// Returns an [`AssemblyFailure`] if any application fails to enumerate
    /// its IDs, any ID fails to resolve, or the shutdown signal is raised.
    /// No partial document is produced in any of these cases.
    pub async fn assemble<R>(
        &self,
        applications: &[Arc<dyn Application>],
        resolver: &R,
    ) -> Result<ExportDocument, AssemblyFailure>
    where
        R: DefinitionResolver + ?Sized,
    {
        self.assemble_with_stats(applications, resolver)
            .await
            .map(|assembly| assembly.document)
    }

    /// Assemble an export document and report counters
    ///
    /// # Errors
    ///
    /// See [`assemble`](Self::assemble).
    pub async fn assemble_with_stats<R>(
        &self,
        applications: &[Arc<dyn Application>],
        resolver: &R,
    ) -> Result<Assembly, AssemblyFailure>
    where
        R: DefinitionResolver + ?Sized,
    {
        tracing::debug!(
            applications = applications.len(),
            concurrency = self.resolve_concurrency,
            "Assembling export"
        );

        let (definitions, stats) = if self.resolve_concurrency > 1 {
            self.collect_concurrently(applications, resolver).await?
        } else {
            self.collect_sequentially(applications, resolver).await?
        };

        let date = self
            .export_date
            .unwrap_or_else(|| Local::now().date_naive());

        Ok(Assembly {
            document: ExportDocument::new(definitions, date),
            stats,
        })
    }

    /// Interleaves enumeration and resolution, one application at a time
    async fn collect_sequentially<R>(
        &self,
        applications: &[Arc<dyn Application>],
        resolver: &R,
    ) -> Result<(Vec<Definition>, AssemblyStats), AssemblyFailure>
    where
        R: DefinitionResolver + ?Sized,
    {
        let mut collected = CollectedDefinitions::default();
        let mut stats = AssemblyStats::default();

        for application in applications {
            let ids = self.enumerate(application.as_ref()).await?;
            stats.applications += 1;
            stats.ids_referenced += ids.len();

            for id in ids {
                if collected.contains(&id) {
                    stats.duplicates_skipped += 1;
                    continue;
                }
                let (id, definition) = self.resolve_one(resolver, id).await?;
                stats.definitions_resolved += 1;
                collected.insert(id, definition);
            }
        }

        Ok((collected.into_definitions(), stats))
    }

    /// Enumerates every application first, then resolves the distinct IDs
    /// with bounded concurrency in first-reference order
    async fn collect_concurrently<R>(
        &self,
        applications: &[Arc<dyn Application>],
        resolver: &R,
    ) -> Result<(Vec<Definition>, AssemblyStats), AssemblyFailure>
    where
        R: DefinitionResolver + ?Sized,
    {
        let mut stats = AssemblyStats::default();
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for application in applications {
            let ids = self.enumerate(application.as_ref()).await?;
            stats.applications += 1;
            stats.ids_referenced += ids.len();

            for id in ids {
                if seen.insert(id.clone()) {
                    ordered.push(id);
                } else {
                    stats.duplicates_skipped += 1;
                }
            }
        }

        // `buffered` yields results in input order
        let resolved: Vec<(DefinitionId, Definition)> = stream::iter(ordered)
            .map(|id| self.resolve_one(resolver, id))
            .buffered(self.resolve_concurrency)
            .try_collect()
            .await?;
        stats.definitions_resolved = resolved.len();

        let mut collected = CollectedDefinitions::default();
        for (id, definition) in resolved {
            collected.insert(id, definition);
        }

        Ok((collected.into_definitions(), stats))
    }

    async fn enumerate(
        &self,
        application: &dyn Application,
    ) -> Result<Vec<DefinitionId>, AssemblyFailure> {
        self.ensure_not_cancelled()?;

        let ids = application
            .export_ids()
            .await
            .map_err(|source| AssemblyFailure::Enumeration {
                application: application.id().clone(),
                source,
            })?;

        tracing::debug!(
            application = %application.id(),
            name = %application.name(),
            id_count = ids.len(),
            "Enumerated application definitions"
        );
        Ok(ids)
    }

    async fn resolve_one<R>(
        &self,
        resolver: &R,
        id: DefinitionId,
    ) -> Result<(DefinitionId, Definition), AssemblyFailure>
    where
        R: DefinitionResolver + ?Sized,
    {
        self.ensure_not_cancelled()?;

        match resolver.definition_by_id(&id, true).await {
            Ok(definition) => Ok((id, definition)),
            Err(source) => {
                tracing::debug!(id = %id, error = %source, "Definition resolution failed");
                Err(AssemblyFailure::Resolution { id, source })
            }
        }
    }

    fn ensure_not_cancelled(&self) -> Result<(), AssemblyFailure> {
        match &self.shutdown_signal {
            Some(signal) if *signal.borrow() => Err(AssemblyFailure::Cancelled),
            _ => Ok(()),
        }
    }
}
