//! Export command implementation
//!
//! Runs one export-all request against the file store and writes the
//! resulting document to stdout or to a file.

use super::load_or_report;
use crate::adapters::filestore::FileStore;
use crate::core::export::{ExportAssembler, ExportDocument};
use crate::core::handler::{Delivery, ExportAllHandler, ExportResponse, HandlerError};
use crate::domain::ExportRequest;
use crate::notify::build_notifier;
use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Tenant to export
    #[arg(short, long)]
    pub tenant: String,

    /// Deliver as a file download (integer; non-zero requests an attachment)
    #[arg(short, long, allow_hyphen_values = true)]
    pub download: Option<String>,

    /// Write the document to this path instead of stdout or the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the document
    #[arg(long)]
    pub pretty: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(tenant = %self.tenant, "Starting export command");

        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let notifier = match build_notifier(&config) {
            Ok(notifier) => notifier,
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up operator notifier");
                eprintln!("❌ Failed to set up operator notifier: {e}");
                return Ok(2);
            }
        };

        let assembler = ExportAssembler::new()
            .with_resolve_concurrency(config.export.resolve_concurrency)
            .with_shutdown_signal(shutdown_signal);
        let store = Arc::new(FileStore::new(&config.store.root));
        let handler = ExportAllHandler::new(store, notifier.clone()).with_assembler(assembler);

        let mut request = ExportRequest::new(&self.tenant);
        if let Some(raw) = &self.download {
            request = request.with_download(parse_download(raw));
        }

        let result = handler.handle(&request).await;

        let flush_timeout = Duration::from_secs(config.notifier.timeout_seconds);
        if tokio::time::timeout(flush_timeout, notifier.flush()).await.is_err() {
            tracing::warn!("Timed out waiting for operator notifications");
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let pretty = self.pretty || config.export.pretty;
        let rendered = render_document(&response.document, pretty)?;

        match self.destination(&response.delivery, Path::new(&config.export.output_dir)) {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, rendered)?;
                tracing::info!(path = %path.display(), "Export written");
                eprintln!("✅ Export written to {}", path.display());
            }
            None => println!("{rendered}"),
        }

        print_summary(&response);
        Ok(0)
    }

    /// Where the document goes; `None` means stdout
    fn destination(&self, delivery: &Delivery, output_dir: &Path) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        match delivery {
            Delivery::Attachment { file_name } => Some(output_dir.join(file_name)),
            Delivery::Inline => None,
        }
    }
}

/// Interpret a raw `--download` argument as a JSON value
///
/// Anything that is not valid JSON is passed through as a string so the
/// handler can reject it with a parameter error.
fn parse_download(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn render_document(document: &ExportDocument, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    }
}

fn exit_code_for(error: &HandlerError) -> i32 {
    match error {
        HandlerError::InvalidParameter(_) => 2,
        HandlerError::ContextUnavailable => 4,
        HandlerError::GatheringFailed => 1,
        HandlerError::Cancelled => 130,
    }
}

fn print_summary(response: &ExportResponse) {
    let summary = &response.summary;
    eprintln!();
    eprintln!("📊 Export Summary:");
    eprintln!("  Tenant: {}", summary.tenant);
    eprintln!("  Applications: {}", summary.total_applications);
    eprintln!("  IDs Referenced: {}", summary.ids_referenced);
    eprintln!("  Definitions Exported: {}", summary.definitions_exported);
    eprintln!(
        "  Duplicates Skipped: {} ({:.2}%)",
        summary.duplicates_skipped,
        summary.duplicate_rate()
    );
    eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    eprintln!("  Checksum: {}", summary.checksum);
}
