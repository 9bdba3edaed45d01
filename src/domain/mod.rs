//! Domain models and types for Compendium.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DefinitionId`], [`TenantId`])
//! - **Domain models** ([`Definition`], [`ExportRequest`])
//! - **Error types** ([`CompendiumError`], [`ContextError`], [`ResolutionError`],
//!   [`ValidationError`], [`AssemblyFailure`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use compendium::domain::{DefinitionId, TenantId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tenant = TenantId::new("acme")?;
//! let id = DefinitionId::new("obj-contacts")?;
//!
//! // This won't compile - tenant names and definition IDs don't mix
//! // let wrong: TenantId = id;
//! # Ok(())
//! # }
//! ```

pub mod definition;
pub mod errors;
pub mod ids;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use definition::Definition;
pub use errors::{AssemblyFailure, CompendiumError, ContextError, ResolutionError, ValidationError};
pub use ids::{DefinitionId, TenantId};
pub use request::{DownloadFlag, ExportRequest};
pub use result::Result;
