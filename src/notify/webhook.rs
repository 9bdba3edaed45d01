//! Webhook operator notifier
//!
//! Ships [`NotificationPayload`]s as JSON to an HTTP endpoint (chat webhook,
//! incident intake, log collector). Delivery runs on a spawned task so the
//! request that raised the notification never waits on it.

use super::{NotificationPayload, OperatorNotifier};
use crate::config::SecretString;
use crate::domain::{CompendiumError, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

/// Notifier posting JSON payloads to a webhook URL
#[derive(Clone)]
pub struct WebhookNotifier {
    url: Url,
    token: Option<SecretString>,
    service: String,
    http_client: reqwest::Client,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("service", &self.service)
            .finish()
    }
}

impl WebhookNotifier {
    /// Create a webhook notifier
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a valid http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(
        url: &str,
        token: Option<SecretString>,
        service: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| {
            CompendiumError::Configuration(format!("Invalid webhook URL '{url}': {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CompendiumError::Configuration(format!(
                "Webhook URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CompendiumError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            url,
            token,
            service: service.into(),
            http_client,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// The endpoint notifications are posted to
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Post a payload and wait for the response
    ///
    /// # Errors
    ///
    /// Returns [`CompendiumError::Notification`] if the request fails or the
    /// endpoint answers with a non-success status.
    pub async fn deliver(&self, payload: &NotificationPayload) -> Result<()> {
        let mut request = self.http_client.post(self.url.clone()).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            CompendiumError::Notification(format!("Failed to send notification: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, context = %payload.context, "Operator notification delivered");
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CompendiumError::Notification(format!(
                "Webhook returned status {status}: {body}"
            )))
        }
    }
}

#[async_trait]
impl OperatorNotifier for WebhookNotifier {
    fn notify(&self, error: &(dyn Error + 'static), context: &str) {
        let payload = NotificationPayload::new(&self.service, error, context);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let notifier = self.clone();
                let task = handle.spawn(async move {
                    if let Err(e) = notifier.deliver(&payload).await {
                        warn!(
                            error = %e,
                            context = %payload.context,
                            "Operator notification not delivered"
                        );
                    }
                });
                if let Ok(mut in_flight) = self.in_flight.lock() {
                    in_flight.retain(|t| !t.is_finished());
                    in_flight.push(task);
                }
            }
            Err(_) => {
                warn!(
                    context = %payload.context,
                    "No async runtime available, operator notification dropped"
                );
            }
        }
    }

    async fn flush(&self) {
        let tasks = match self.in_flight.lock() {
            Ok(mut in_flight) => std::mem::take(&mut *in_flight),
            Err(_) => return,
        };
        for task in tasks {
            let _ = task.await;
        }
    }
}
