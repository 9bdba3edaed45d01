//! File-backed tenant store
//!
//! Implements every collaborator trait on top of a plain directory tree of
//! JSON files, one directory per tenant.

pub mod models;
pub mod store;

pub use models::ApplicationRecord;
pub use store::{FileApplication, FileStore, FileTenantContext};
