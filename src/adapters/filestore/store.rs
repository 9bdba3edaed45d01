//! Directory-backed tenant store
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<tenant>/applications/<app-id>.json
//! <root>/<tenant>/definitions/<definition-id>.json
//! ```
//!
//! Every file holds one JSON object with an `id` equal to its file stem.
//! Application records are definitions too and resolve like any other ID.
//!
//! A tenant context reads each definition file at most once. Files changed
//! after a context was resolved are seen by the next context only.

use super::models::{dependencies_of, ApplicationRecord};
use crate::adapters::traits::{
    Application, ApplicationEnumerator, DefinitionResolver, TenantContext, TenantContextProvider,
};
use crate::domain::{
    ContextError, Definition, DefinitionId, ExportRequest, ResolutionError, TenantId,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const APPLICATIONS_DIR: &str = "applications";
const DEFINITIONS_DIR: &str = "definitions";

/// File store rooted at a directory containing one sub-directory per tenant
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TenantContextProvider for FileStore {
    async fn resolve(
        &self,
        request: &ExportRequest,
    ) -> Result<Arc<dyn TenantContext>, ContextError> {
        let tenant = TenantId::new(request.tenant.as_str()).map_err(ContextError::InvalidTenant)?;
        let dir = self.root.join(tenant.as_str());

        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ContextError::TenantNotFound(tenant.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ContextError::TenantNotFound(tenant.to_string()));
            }
            Err(e) => {
                return Err(ContextError::StoreUnavailable(format!(
                    "{}: {e}",
                    dir.display()
                )));
            }
        }

        tracing::debug!(
            tenant = %tenant,
            path = %dir.display(),
            "Resolved tenant context"
        );

        Ok(Arc::new(FileTenantContext {
            tenant,
            files: Arc::new(DefinitionFiles::new(&dir)),
        }))
    }
}

/// Paths, parsing and per-context caches shared by a tenant context and its
/// applications
#[derive(Debug)]
struct DefinitionFiles {
    applications_dir: PathBuf,
    definitions_dir: PathBuf,
    loaded: Mutex<HashMap<DefinitionId, Definition>>,
    /// IDs whose whole dependency closure is known to exist
    verified: Mutex<HashSet<DefinitionId>>,
}

impl DefinitionFiles {
    fn new(tenant_dir: &Path) -> Self {
        Self {
            applications_dir: tenant_dir.join(APPLICATIONS_DIR),
            definitions_dir: tenant_dir.join(DEFINITIONS_DIR),
            loaded: Mutex::new(HashMap::new()),
            verified: Mutex::new(HashSet::new()),
        }
    }

    fn cached(&self, id: &DefinitionId) -> Option<Definition> {
        self.loaded.lock().ok()?.get(id).cloned()
    }

    fn is_verified(&self, id: &DefinitionId) -> bool {
        self.verified
            .lock()
            .map(|verified| verified.contains(id))
            .unwrap_or(false)
    }

    fn mark_verified(&self, ids: impl IntoIterator<Item = DefinitionId>) {
        if let Ok(mut verified) = self.verified.lock() {
            verified.extend(ids);
        }
    }

    async fn locate(&self, id: &DefinitionId) -> Result<PathBuf, ResolutionError> {
        if !id.is_path_safe() {
            return Err(ResolutionError::InvalidId(id.to_string()));
        }

        let file_name = format!("{id}.json");
        for dir in [&self.definitions_dir, &self.applications_dir] {
            let candidate = dir.join(&file_name);
            if tokio::fs::metadata(&candidate).await.is_ok() {
                return Ok(candidate);
            }
        }
        Err(ResolutionError::NotFound(id.clone()))
    }

    async fn load(&self, id: &DefinitionId) -> Result<Definition, ResolutionError> {
        if let Some(definition) = self.cached(id) {
            return Ok(definition);
        }
        let definition = self.read(id).await?;
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.insert(id.clone(), definition.clone());
        }
        Ok(definition)
    }

    async fn read(&self, id: &DefinitionId) -> Result<Definition, ResolutionError> {
        let path = self.locate(id).await?;

        let contents =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ResolutionError::Unreadable {
                    id: id.clone(),
                    message: format!("{}: {e}", path.display()),
                })?;

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|e| ResolutionError::Malformed {
                id: id.clone(),
                message: e.to_string(),
            })?;

        let found = value.get("id").and_then(|v| v.as_str());
        if found != Some(id.as_str()) {
            return Err(ResolutionError::IdMismatch {
                requested: id.clone(),
                found: found.unwrap_or("<missing>").to_string(),
            });
        }

        Definition::from_value(value).map_err(|e| ResolutionError::Malformed {
            id: id.clone(),
            message: e.to_string(),
        })
    }

    /// Transitive dependencies of `root` in depth-first pre-order
    ///
    /// Each ID appears once and `root` itself is never included. In strict
    /// mode a dependency without a file is an error; otherwise it is listed
    /// but not descended into.
    ///
    /// A strict walk stops at subtrees already verified and marks every ID it
    /// walked as verified once it succeeds.
    async fn walk_dependencies(
        &self,
        root: &Definition,
        strict: bool,
    ) -> Result<Vec<DefinitionId>, ResolutionError> {
        let mut visited: HashSet<DefinitionId> = HashSet::from([root.id.clone()]);
        let mut ordered = Vec::new();
        let mut stack: Vec<(DefinitionId, DefinitionId)> = dependencies_of(root)?
            .into_iter()
            .rev()
            .map(|dep| (root.id.clone(), dep))
            .collect();

        while let Some((parent, id)) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            ordered.push(id.clone());
            if strict && self.is_verified(&id) {
                continue;
            }

            match self.load(&id).await {
                Ok(definition) => {
                    for dep in dependencies_of(&definition)?.into_iter().rev() {
                        if !visited.contains(&dep) {
                            stack.push((id.clone(), dep));
                        }
                    }
                }
                Err(ResolutionError::NotFound(_)) if !strict => {}
                Err(ResolutionError::NotFound(missing)) => {
                    return Err(ResolutionError::MissingDependency {
                        id: parent,
                        dependency: missing,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if strict {
            self.mark_verified(ordered.iter().cloned().chain([root.id.clone()]));
        }
        Ok(ordered)
    }
}

/// Tenant context over one tenant directory
#[derive(Debug)]
pub struct FileTenantContext {
    tenant: TenantId,
    files: Arc<DefinitionFiles>,
}

#[async_trait]
impl ApplicationEnumerator for FileTenantContext {
    async fn applications(&self) -> Result<Vec<Arc<dyn Application>>, ContextError> {
        let dir = &self.files.applications_dir;
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(tenant = %self.tenant, "Tenant has no applications directory");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ContextError::StoreUnavailable(format!(
                    "{}: {e}",
                    dir.display()
                )));
            }
        };

        let mut paths = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("json") {
                        paths.push(path);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(ContextError::StoreUnavailable(format!(
                        "{}: {e}",
                        dir.display()
                    )));
                }
            }
        }
        paths.sort();

        let mut applications: Vec<Arc<dyn Application>> = Vec::with_capacity(paths.len());
        for path in paths {
            let record = read_application_record(&path).await?;
            applications.push(Arc::new(FileApplication {
                record,
                files: Arc::clone(&self.files),
            }));
        }

        tracing::debug!(
            tenant = %self.tenant,
            count = applications.len(),
            "Enumerated applications"
        );

        Ok(applications)
    }
}

#[async_trait]
impl DefinitionResolver for FileTenantContext {
    async fn definition_by_id(
        &self,
        id: &DefinitionId,
        expand_dependencies: bool,
    ) -> Result<Definition, ResolutionError> {
        let definition = self.files.load(id).await?;
        if expand_dependencies && !self.files.is_verified(id) {
            let dependencies = self.files.walk_dependencies(&definition, true).await?;
            tracing::trace!(
                id = %id,
                dependency_count = dependencies.len(),
                "Verified definition dependencies"
            );
        }
        Ok(definition)
    }
}

impl TenantContext for FileTenantContext {
    fn tenant(&self) -> &TenantId {
        &self.tenant
    }
}

async fn read_application_record(path: &Path) -> Result<ApplicationRecord, ContextError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let invalid = |message: String| ContextError::InvalidApplication {
        application: stem.clone(),
        message,
    };

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| invalid(e.to_string()))?;
    let record: ApplicationRecord =
        serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;

    if record.id.as_str() != stem {
        return Err(invalid(format!(
            "record id '{}' does not match file name",
            record.id
        )));
    }
    Ok(record)
}

/// Application backed by an application record file
#[derive(Debug)]
pub struct FileApplication {
    record: ApplicationRecord,
    files: Arc<DefinitionFiles>,
}

#[async_trait]
impl Application for FileApplication {
    fn id(&self) -> &DefinitionId {
        &self.record.id
    }

    fn name(&self) -> &str {
        self.record.name.as_deref().unwrap_or(self.record.id.as_str())
    }

    /// The application itself, then each referenced definition followed by
    /// its transitive dependencies
    async fn export_ids(&self) -> Result<Vec<DefinitionId>, ResolutionError> {
        let enumeration = |e: ResolutionError| ResolutionError::Enumeration {
            application: self.record.id.to_string(),
            message: e.to_string(),
        };

        let mut ids = vec![self.record.id.clone()];
        for id in &self.record.definitions {
            ids.push(id.clone());
            match self.files.load(id).await {
                Ok(definition) => {
                    let dependencies = self
                        .files
                        .walk_dependencies(&definition, false)
                        .await
                        .map_err(enumeration)?;
                    ids.extend(dependencies);
                }
                // Reported by the resolver when the ID is resolved
                Err(ResolutionError::NotFound(_)) => {}
                Err(e) => return Err(enumeration(e)),
            }
        }
        Ok(ids)
    }
}
