//! Export-all request handler
//!
//! The boundary between a transport and the assembler. It validates the
//! request, binds it to a tenant, runs the assembly and decides how the
//! response is framed. Operational failures go to the operator notifier and
//! the caller only receives a generic message.

use crate::adapters::traits::TenantContextProvider;
use crate::core::export::checksum::calculate_checksum;
use crate::core::export::{ExportAssembler, ExportDocument, ExportSummary};
use crate::domain::{DownloadFlag, ExportRequest, ValidationError};
use crate::notify::OperatorNotifier;
use crate::{log_error_with_context, log_export_complete, log_export_start};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::Instrument;

/// Operation name used in notifier tags and logs
pub const OPERATION: &str = "export-all";

const CONTEXT_STAGE: &str = "Error initializing tenant context";
const GATHERING_STAGE: &str = "Error gathering definitions";

/// Caller-facing handler errors
///
/// Apart from [`HandlerError::InvalidParameter`] none of these carry the
/// underlying cause; that goes to the operator notifier only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The request carried a malformed parameter
    #[error("{0}")]
    InvalidParameter(#[from] ValidationError),

    /// The tenant context or its application list was unavailable
    #[error("Error initializing tenant context.")]
    ContextUnavailable,

    /// Enumeration or resolution failed during assembly
    #[error("Error gathering definitions.")]
    GatheringFailed,

    /// The export was cancelled before completion
    #[error("Export cancelled.")]
    Cancelled,
}

/// How the transport should deliver the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Return the document as the response body
    Inline,

    /// Offer the document as a file download
    Attachment { file_name: String },
}

/// Successful export-all response
#[derive(Debug, Clone)]
pub struct ExportResponse {
    pub document: ExportDocument,
    pub delivery: Delivery,
    pub summary: ExportSummary,
}

/// Handles export-all requests
pub struct ExportAllHandler {
    provider: Arc<dyn TenantContextProvider>,
    notifier: Arc<dyn OperatorNotifier>,
    assembler: ExportAssembler,
}

impl ExportAllHandler {
    pub fn new(
        provider: Arc<dyn TenantContextProvider>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        Self {
            provider,
            notifier,
            assembler: ExportAssembler::new(),
        }
    }

    /// Replace the assembler, e.g. to set concurrency or a shutdown signal
    pub fn with_assembler(mut self, assembler: ExportAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Handle one export-all request
    ///
    /// # Errors
    ///
    /// - [`HandlerError::InvalidParameter`] if `download` is not an integer;
    ///   no collaborator is called in that case
    /// - [`HandlerError::ContextUnavailable`] if the tenant context or its
    ///   applications cannot be obtained
    /// - [`HandlerError::GatheringFailed`] if assembly fails
    /// - [`HandlerError::Cancelled`] if the shutdown signal was raised
    pub async fn handle(&self, request: &ExportRequest) -> Result<ExportResponse, HandlerError> {
        let span = tracing::info_span!(
            "export",
            operation = OPERATION,
            request_id = %request.request_id,
            tenant = %request.tenant
        );
        self.handle_inner(request).instrument(span).await
    }

    async fn handle_inner(&self, request: &ExportRequest) -> Result<ExportResponse, HandlerError> {
        let start_time = Instant::now();

        let download = DownloadFlag::parse(request.download.as_ref()).map_err(|e| {
            tracing::warn!(error = %e, "Rejected export request");
            HandlerError::from(e)
        })?;

        log_export_start!(request.request_id, request.tenant);

        let context = match self.provider.resolve(request).await {
            Ok(context) => context,
            Err(e) => {
                self.report(&e, CONTEXT_STAGE);
                return Err(HandlerError::ContextUnavailable);
            }
        };

        let applications = match context.applications().await {
            Ok(applications) => applications,
            Err(e) => {
                self.report(&e, CONTEXT_STAGE);
                return Err(HandlerError::ContextUnavailable);
            }
        };

        let assembly = match self
            .assembler
            .assemble_with_stats(&applications, context.as_ref())
            .await
        {
            Ok(assembly) => assembly,
            Err(e) if e.is_cancelled() => {
                tracing::warn!("Export cancelled");
                return Err(HandlerError::Cancelled);
            }
            Err(e) => {
                self.report(&e, GATHERING_STAGE);
                return Err(HandlerError::GatheringFailed);
            }
        };

        let checksum = match calculate_checksum(&assembly.document) {
            Ok(checksum) => checksum,
            Err(e) => {
                self.report(&e, GATHERING_STAGE);
                return Err(HandlerError::GatheringFailed);
            }
        };

        let duration = start_time.elapsed();
        let summary = ExportSummary::new(context.tenant().clone(), &assembly.stats, checksum)
            .with_duration(duration);
        log_export_complete!(assembly.document.len(), duration);
        summary.log_summary();

        let delivery = if download.is_requested() {
            Delivery::Attachment {
                file_name: attachment_file_name(
                    context.tenant().as_str(),
                    assembly.document.generated_at,
                ),
            }
        } else {
            Delivery::Inline
        };

        Ok(ExportResponse {
            document: assembly.document,
            delivery,
            summary,
        })
    }

    fn report(&self, error: &(dyn std::error::Error + 'static), stage: &str) {
        let context = format!("{OPERATION}: {stage}");
        log_error_with_context!(error, context.as_str());
        self.notifier.notify(error, &context);
    }
}

/// File name offered for attachment delivery
pub fn attachment_file_name(tenant: &str, date: NaiveDate) -> String {
    format!("export_{}_{}.json", tenant, date.format("%Y%m%d"))
}
