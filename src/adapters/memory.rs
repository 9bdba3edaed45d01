//! In-memory collaborators (testing and embedding)
//!
//! Provides `MemoryTenantProvider`, `MemoryTenant` and `MemoryApplication`
//! that satisfy the collaborator traits without touching disk. The tenant
//! counts resolver calls so tests can assert on them.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::adapters::traits::*;
use crate::domain::{
    ContextError, Definition, DefinitionId, ExportRequest, ResolutionError, TenantId,
};

// ---------------------------------------------------------------------------
// MemoryTenantProvider
// ---------------------------------------------------------------------------

/// Tenant context provider backed by a `HashMap<tenant, MemoryTenant>`.
#[derive(Debug, Default)]
pub struct MemoryTenantProvider {
    tenants: HashMap<String, Arc<MemoryTenant>>,
    resolve_calls: AtomicUsize,
}

impl MemoryTenantProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant
    pub fn with_tenant(mut self, tenant: Arc<MemoryTenant>) -> Self {
        self.tenants
            .insert(tenant.tenant().as_str().to_string(), tenant);
        self
    }

    /// Number of times `resolve` was called
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantContextProvider for MemoryTenantProvider {
    async fn resolve(
        &self,
        request: &ExportRequest,
    ) -> Result<Arc<dyn TenantContext>, ContextError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let tenant = TenantId::new(request.tenant.as_str()).map_err(ContextError::InvalidTenant)?;
        self.tenants
            .get(tenant.as_str())
            .cloned()
            .map(|t| t as Arc<dyn TenantContext>)
            .ok_or_else(|| ContextError::TenantNotFound(tenant.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MemoryTenant
// ---------------------------------------------------------------------------

/// A tenant holding applications and definitions in memory.
///
/// Unknown IDs fail with [`ResolutionError::NotFound`] unless the tenant was
/// created with [`MemoryTenant::synthesizing`], in which case they resolve to
/// `{"id": <id>, "value": "<id>-def"}`.
#[derive(Debug)]
pub struct MemoryTenant {
    tenant: TenantId,
    applications: Vec<Arc<MemoryApplication>>,
    definitions: HashMap<DefinitionId, Definition>,
    failing: HashSet<DefinitionId>,
    synthesize: bool,
    fail_enumeration: bool,
    calls: Mutex<Vec<(DefinitionId, bool)>>,
}

impl MemoryTenant {
    pub fn new(tenant: TenantId) -> Self {
        Self {
            tenant,
            applications: Vec::new(),
            definitions: HashMap::new(),
            failing: HashSet::new(),
            synthesize: false,
            fail_enumeration: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A tenant whose resolver fabricates a definition for any ID
    pub fn synthesizing(tenant: TenantId) -> Self {
        Self {
            synthesize: true,
            ..Self::new(tenant)
        }
    }

    pub fn with_application(mut self, application: MemoryApplication) -> Self {
        self.applications.push(Arc::new(application));
        self
    }

    pub fn with_definition(mut self, definition: Definition) -> Self {
        self.definitions.insert(definition.id.clone(), definition);
        self
    }

    /// Make resolution of `id` fail
    pub fn with_failing_definition(mut self, id: DefinitionId) -> Self {
        self.failing.insert(id);
        self
    }

    /// Make `applications()` fail
    pub fn with_failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// Number of `definition_by_id` calls so far
    pub fn resolve_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every `definition_by_id` call in order, with its expand flag
    pub fn calls(&self) -> Vec<(DefinitionId, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApplicationEnumerator for MemoryTenant {
    async fn applications(&self) -> Result<Vec<Arc<dyn Application>>, ContextError> {
        if self.fail_enumeration {
            return Err(ContextError::StoreUnavailable(format!(
                "applications of tenant {} are unavailable",
                self.tenant
            )));
        }
        Ok(self
            .applications
            .iter()
            .map(|app| app.clone() as Arc<dyn Application>)
            .collect())
    }
}

#[async_trait]
impl DefinitionResolver for MemoryTenant {
    async fn definition_by_id(
        &self,
        id: &DefinitionId,
        expand_dependencies: bool,
    ) -> Result<Definition, ResolutionError> {
        self.calls
            .lock()
            .unwrap()
            .push((id.clone(), expand_dependencies));

        if self.failing.contains(id) {
            return Err(ResolutionError::Unreadable {
                id: id.clone(),
                message: "simulated backend failure".to_string(),
            });
        }

        if let Some(definition) = self.definitions.get(id) {
            return Ok(definition.clone());
        }

        if self.synthesize {
            return Ok(Definition::new(id.clone())
                .with_attribute("value", json!(format!("{id}-def"))));
        }

        Err(ResolutionError::NotFound(id.clone()))
    }
}

impl TenantContext for MemoryTenant {
    fn tenant(&self) -> &TenantId {
        &self.tenant
    }
}

// ---------------------------------------------------------------------------
// MemoryApplication
// ---------------------------------------------------------------------------

/// An application with a fixed list of exported IDs.
#[derive(Debug, Clone)]
pub struct MemoryApplication {
    id: DefinitionId,
    name: String,
    ids: Vec<DefinitionId>,
    fail: bool,
}

impl MemoryApplication {
    pub fn new(id: DefinitionId, ids: Vec<DefinitionId>) -> Self {
        Self {
            name: id.to_string(),
            id,
            ids,
            fail: false,
        }
    }

    /// Build from string IDs
    ///
    /// # Panics
    ///
    /// Panics if any ID is empty; intended for test fixtures.
    pub fn from_strs(id: &str, ids: &[&str]) -> Self {
        let parse = |s: &str| DefinitionId::new(s).expect("fixture IDs must be non-empty");
        Self::new(parse(id), ids.iter().map(|s| parse(s)).collect())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make `export_ids()` fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Application for MemoryApplication {
    fn id(&self) -> &DefinitionId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn export_ids(&self) -> Result<Vec<DefinitionId>, ResolutionError> {
        if self.fail {
            return Err(ResolutionError::Enumeration {
                application: self.id.to_string(),
                message: "simulated enumeration failure".to_string(),
            });
        }
        Ok(self.ids.clone())
    }
}
