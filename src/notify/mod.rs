//! Operator notification
//!
//! Operational failures are reported to operators through an
//! [`OperatorNotifier`] while callers only ever see a generic message.
//! Notification is fire-and-forget: a notifier never fails the request that
//! triggered it.
//!
//! - [`TracingNotifier`] - emits an error event through `tracing`
//! - [`webhook::WebhookNotifier`] - POSTs a JSON payload to an HTTP endpoint
//! - [`FanoutNotifier`] - forwards to several notifiers
//!
//! # Example
//!
//! ```no_run
//! use compendium::notify::{OperatorNotifier, TracingNotifier};
//!
//! let notifier = TracingNotifier::new("compendium");
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
//! notifier.notify(&err, "export-all: Error gathering definitions");
//! ```

pub mod webhook;

use crate::config::CompendiumConfig;
use crate::domain::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub use webhook::WebhookNotifier;

/// Receives operational errors for operators
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// Report an error together with a tag naming the failing stage
    fn notify(&self, error: &(dyn Error + 'static), context: &str);

    /// Wait for deliveries still in flight
    async fn flush(&self) {}
}

/// A single operator notification as shipped to external channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Reporting service
    pub service: String,

    /// Stage tag supplied by the caller
    pub context: String,

    /// Top-level error message
    pub error: String,

    /// Messages of the error's source chain, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,

    /// When the notification was raised
    pub timestamp: DateTime<Utc>,
}

impl NotificationPayload {
    /// Capture an error and its source chain
    pub fn new(service: &str, error: &(dyn Error + 'static), context: &str) -> Self {
        Self {
            service: service.to_string(),
            context: context.to_string(),
            error: error.to_string(),
            causes: source_chain(error),
            timestamp: Utc::now(),
        }
    }
}

fn source_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes
}

/// Notifier that logs through `tracing`
#[derive(Debug, Clone)]
pub struct TracingNotifier {
    service: String,
}

impl TracingNotifier {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

#[async_trait]
impl OperatorNotifier for TracingNotifier {
    fn notify(&self, error: &(dyn Error + 'static), context: &str) {
        let causes = source_chain(error);
        tracing::error!(
            service = %self.service,
            context = context,
            error = %error,
            causes = ?causes,
            "Operator notification"
        );
    }
}

/// Notifier forwarding to every wrapped notifier in order
#[derive(Clone, Default)]
pub struct FanoutNotifier {
    notifiers: Vec<Arc<dyn OperatorNotifier>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn OperatorNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl OperatorNotifier for FanoutNotifier {
    fn notify(&self, error: &(dyn Error + 'static), context: &str) {
        for notifier in &self.notifiers {
            notifier.notify(error, context);
        }
    }

    async fn flush(&self) {
        for notifier in &self.notifiers {
            notifier.flush().await;
        }
    }
}

/// Build the notifier chain described by the configuration
///
/// Tracing is always on; the webhook is added when enabled.
///
/// # Errors
///
/// Returns an error if the webhook is enabled but cannot be constructed.
pub fn build_notifier(config: &CompendiumConfig) -> Result<Arc<dyn OperatorNotifier>> {
    let service = config.application.service_name.clone();
    let tracing_notifier: Arc<dyn OperatorNotifier> = Arc::new(TracingNotifier::new(&service));

    if !config.notifier.webhook_enabled {
        return Ok(tracing_notifier);
    }

    let url = config.notifier.webhook_url.as_deref().ok_or_else(|| {
        crate::domain::CompendiumError::Configuration(
            "notifier.webhook_url is required when the webhook is enabled".to_string(),
        )
    })?;

    let webhook = WebhookNotifier::new(
        url,
        config.notifier.webhook_token.clone(),
        service,
        Duration::from_secs(config.notifier.timeout_seconds),
    )?;

    Ok(Arc::new(
        FanoutNotifier::new()
            .with(tracing_notifier)
            .with(Arc::new(webhook)),
    ))
}
