//! Collaborator integrations for Compendium.
//!
//! - [`traits`] - The collaborator interfaces the export pipeline consumes
//! - [`filestore`] - Directory-backed tenant store
//! - [`memory`] - In-memory implementations for tests and embedding
//!
//! # Design Pattern
//!
//! Adapters isolate storage and tenancy from the export pipeline. The
//! pipeline only sees trait objects, so a different backend can be dropped in
//! without touching the assembler.
//!
//! ```rust,no_run
//! use compendium::adapters::filestore::FileStore;
//! use compendium::adapters::traits::{ApplicationEnumerator, TenantContextProvider};
//! use compendium::domain::ExportRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new("/var/lib/compendium");
//! let context = store.resolve(&ExportRequest::new("acme")).await?;
//! for app in context.applications().await? {
//!     println!("{}", app.name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod filestore;
pub mod memory;
pub mod traits;
