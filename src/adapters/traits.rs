//! Collaborator traits
//!
//! The export pipeline talks to its environment only through these traits.
//! Backends (the file store, the in-memory fakes) implement them; the
//! assembler and the request handler consume them.

use crate::domain::{
    ContextError, Definition, DefinitionId, ExportRequest, ResolutionError, TenantId,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Binds an inbound request to the tenant it targets
#[async_trait]
pub trait TenantContextProvider: Send + Sync {
    /// Resolve the tenant context for a request
    ///
    /// # Errors
    ///
    /// Returns a [`ContextError`] if the tenant is malformed, unknown, or its
    /// store cannot be reached.
    async fn resolve(
        &self,
        request: &ExportRequest,
    ) -> Result<Arc<dyn TenantContext>, ContextError>;
}

/// Lists the applications registered to a tenant
#[async_trait]
pub trait ApplicationEnumerator: Send + Sync {
    /// All applications of the tenant, in a stable order
    async fn applications(&self) -> Result<Vec<Arc<dyn Application>>, ContextError>;
}

/// Maps a definition ID to its full definition
#[async_trait]
pub trait DefinitionResolver: Send + Sync {
    /// Resolve a single definition
    ///
    /// When `expand_dependencies` is set the resolver also makes sure that
    /// everything the definition transitively depends on is resolvable.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] if the definition (or, when expanding,
    /// one of its dependencies) cannot be produced.
    async fn definition_by_id(
        &self,
        id: &DefinitionId,
        expand_dependencies: bool,
    ) -> Result<Definition, ResolutionError>;
}

/// A resolved tenant environment
///
/// Combines application enumeration and definition resolution for a single
/// tenant.
pub trait TenantContext: ApplicationEnumerator + DefinitionResolver {
    /// The tenant this context is bound to
    fn tenant(&self) -> &TenantId;
}

/// A tenant-scoped application referencing a set of definitions
#[async_trait]
pub trait Application: Send + Sync {
    /// The application's own definition ID
    fn id(&self) -> &DefinitionId;

    /// Human-readable name
    fn name(&self) -> &str;

    /// IDs of every definition this application exports
    ///
    /// Order is significant and duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] if the application's references cannot
    /// be read.
    async fn export_ids(&self) -> Result<Vec<DefinitionId>, ResolutionError>;
}
