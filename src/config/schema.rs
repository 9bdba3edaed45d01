//! Configuration schema types

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Compendium configuration
///
/// Maps to `compendium.toml`. Every section has defaults, so an empty file
/// is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompendiumConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Definition store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Export behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Operator notification channels
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CompendiumConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.store.validate()?;
        self.export.validate()?;
        self.notifier.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Service name reported to operators
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.service_name.trim().is_empty() {
            return Err("application.service_name cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            service_name: default_service_name(),
        }
    }
}

/// File store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per tenant
    #[serde(default = "default_store_root")]
    pub root: String,
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.trim().is_empty() {
            return Err("store.root cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Definitions resolved at once; 1 keeps resolution strictly sequential
    #[serde(default = "default_resolve_concurrency")]
    pub resolve_concurrency: usize,

    /// Directory attachment downloads are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Pretty-print exported documents
    #[serde(default)]
    pub pretty: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.resolve_concurrency == 0 || self.resolve_concurrency > 64 {
            return Err(format!(
                "export.resolve_concurrency must be between 1 and 64, got {}",
                self.resolve_concurrency
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            resolve_concurrency: default_resolve_concurrency(),
            output_dir: default_output_dir(),
            pretty: false,
        }
    }
}

/// Operator notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Post notifications to a webhook in addition to the log
    #[serde(default)]
    pub webhook_enabled: bool,

    /// Webhook endpoint
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Bearer token sent with webhook requests
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub webhook_token: Option<SecretString>,

    /// Webhook request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl NotifierConfig {
    fn validate(&self) -> Result<(), String> {
        if self.webhook_enabled {
            match self.webhook_url.as_deref() {
                None | Some("") => {
                    return Err(
                        "Webhook notifier enabled but webhook_url not provided".to_string(),
                    );
                }
                Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                    return Err(format!(
                        "notifier.webhook_url must start with http:// or https://, got '{url}'"
                    ));
                }
                Some(_) => {}
            }
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "notifier.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        Ok(())
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_enabled: false,
            webhook_url: None,
            webhook_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "compendium".to_string()
}

fn default_store_root() -> String {
    "./data".to_string()
}

fn default_resolve_concurrency() -> usize {
    1
}

fn default_output_dir() -> String {
    "./exports".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
