//! Export assembly
//!
//! This module provides the core export logic:
//! - Collection and deduplication of definitions ([`ExportAssembler`])
//! - The versioned output document ([`ExportDocument`])
//! - Checksums and summary reporting

pub mod assembler;
pub mod checksum;
pub mod document;
pub mod summary;

pub use assembler::{Assembly, AssemblyStats, ExportAssembler};
pub use document::{ExportDocument, FORMAT_VERSION};
pub use summary::ExportSummary;
