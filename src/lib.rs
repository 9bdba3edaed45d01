// Compendium - Tenant-wide Definition Export
// Copyright (c) 2025 Compendium Contributors
// Licensed under the MIT License

//! # Compendium - Tenant-wide Definition Export
//!
//! Compendium produces a complete, deduplicated bundle of every definition
//! referenced by the applications of a tenant.
//!
//! ## Overview
//!
//! - **Binding** a request to a tenant's data scope
//! - **Enumerating** the definition IDs each application depends on
//! - **Resolving** every distinct ID exactly once, in first-reference order
//! - **Packaging** the result as a versioned, dated export document
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export assembly and the export-all request handler
//! - [`adapters`] - Collaborator traits, the file store and in-memory fakes
//! - [`domain`] - Core domain types, IDs and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`notify`] - Operator notification channels
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compendium::adapters::filestore::FileStore;
//! use compendium::config::load_config;
//! use compendium::core::export::ExportAssembler;
//! use compendium::core::handler::ExportAllHandler;
//! use compendium::domain::ExportRequest;
//! use compendium::notify::build_notifier;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("compendium.toml")?;
//!
//!     let handler = ExportAllHandler::new(
//!         Arc::new(FileStore::new(&config.store.root)),
//!         build_notifier(&config)?,
//!     )
//!     .with_assembler(
//!         ExportAssembler::new().with_resolve_concurrency(config.export.resolve_concurrency),
//!     );
//!
//!     let response = handler.handle(&ExportRequest::new("acme")).await?;
//!     println!("{}", serde_json::to_string(&response.document)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! ```json
//! {
//!   "abVersion": "0.0.0",
//!   "date": "20240309",
//!   "definitions": [{ "id": "1", "...": "..." }]
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library errors use [`domain::CompendiumError`] and the focused enums in
//! [`domain::errors`]. The request handler never returns internal causes to
//! its caller; they are forwarded to a [`notify::OperatorNotifier`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod notify;
