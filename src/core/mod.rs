//! Core business logic for Compendium.
//!
//! # Modules
//!
//! - [`export`] - Collection, deduplication and packaging of definitions
//! - [`handler`] - The export-all request boundary
//!
//! # Export Workflow
//!
//! 1. **Validate**: Reject a malformed `download` parameter
//! 2. **Bind**: Resolve the tenant context and list its applications
//! 3. **Assemble**: Resolve every referenced definition once, in first-reference order
//! 4. **Report**: Checksum and summary; failures go to the operator notifier
//!
//! # Example
//!
//! ```rust,no_run
//! use compendium::adapters::filestore::FileStore;
//! use compendium::core::handler::ExportAllHandler;
//! use compendium::domain::ExportRequest;
//! use compendium::notify::TracingNotifier;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = ExportAllHandler::new(
//!     Arc::new(FileStore::new("/var/lib/compendium")),
//!     Arc::new(TracingNotifier::new("compendium")),
//! );
//!
//! let response = handler.handle(&ExportRequest::new("acme")).await?;
//! println!("Definitions: {}", response.document.len());
//! println!("Checksum: {}", response.summary.checksum);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod handler;
