//! Domain error types
//!
//! The error hierarchy for Compendium. Collaborator failures are described by
//! focused enums ([`ContextError`], [`ResolutionError`], [`ValidationError`])
//! and the assembler wraps them into [`AssemblyFailure`]. None of them expose
//! third-party types.

use super::ids::DefinitionId;
use thiserror::Error;

/// Main Compendium error type
#[derive(Debug, Error)]
pub enum CompendiumError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Tenant context could not be established
    #[error("Tenant context error: {0}")]
    Context(#[from] ContextError),

    /// A definition could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Request parameters were rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Export assembly failed
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyFailure),

    /// Operator notification errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Tenant context errors
///
/// Raised when a request cannot be bound to a tenant's data scope, or when
/// the tenant's applications cannot be listed.
#[derive(Debug, Error)]
pub enum ContextError {
    /// Tenant name is malformed
    #[error("Invalid tenant: {0}")]
    InvalidTenant(String),

    /// Tenant does not exist
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    /// The backing store could not be reached or read
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// An application record is unusable
    #[error("Invalid application record {application}: {message}")]
    InvalidApplication { application: String, message: String },
}

/// Definition resolution errors
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No definition exists for the ID
    #[error("Definition not found: {0}")]
    NotFound(DefinitionId),

    /// The ID cannot be used with this store
    #[error("Invalid definition ID: {0}")]
    InvalidId(String),

    /// The stored definition could not be read
    #[error("Failed to read definition {id}: {message}")]
    Unreadable { id: DefinitionId, message: String },

    /// The stored definition is not a valid definition object
    #[error("Malformed definition {id}: {message}")]
    Malformed { id: DefinitionId, message: String },

    /// The stored definition carries a different ID than requested
    #[error("Definition ID mismatch: requested {requested}, found {found}")]
    IdMismatch { requested: DefinitionId, found: String },

    /// A transitive dependency is missing
    #[error("Definition {id} depends on missing definition {dependency}")]
    MissingDependency {
        id: DefinitionId,
        dependency: DefinitionId,
    },

    /// An application could not list the IDs it depends on
    #[error("Failed to enumerate definitions of application {application}: {message}")]
    Enumeration { application: String, message: String },
}

/// Request parameter validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A parameter has the wrong type or value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Export assembly failure
///
/// The assembler is all-or-nothing: any of these means no document was
/// produced.
#[derive(Debug, Error)]
pub enum AssemblyFailure {
    /// An application failed to enumerate its definition IDs
    #[error("Failed to enumerate application {application}: {source}")]
    Enumeration {
        application: DefinitionId,
        #[source]
        source: ResolutionError,
    },

    /// A definition failed to resolve
    #[error("Failed to resolve definition {id}: {source}")]
    Resolution {
        id: DefinitionId,
        #[source]
        source: ResolutionError,
    },

    /// The caller cancelled the export
    #[error("Export assembly cancelled")]
    Cancelled,
}

impl AssemblyFailure {
    /// Whether the failure is a cancellation rather than an error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AssemblyFailure::Cancelled)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CompendiumError {
    fn from(err: std::io::Error) -> Self {
        CompendiumError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CompendiumError {
    fn from(err: serde_json::Error) -> Self {
        CompendiumError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CompendiumError {
    fn from(err: toml::de::Error) -> Self {
        CompendiumError::Configuration(format!("TOML parse error: {err}"))
    }
}
