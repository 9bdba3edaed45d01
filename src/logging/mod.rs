//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Console output, always on
//! - JSON-formatted file logs with rotation, when enabled
//! - Log level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use compendium::logging::init_logging;
//! use compendium::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export
///
/// # Example
///
/// ```no_run
/// use compendium::log_export_start;
/// use uuid::Uuid;
///
/// log_export_start!(Uuid::new_v4(), "acme");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($request_id:expr, $tenant:expr) => {
        tracing::info!(
            request_id = %$request_id,
            tenant = %$tenant,
            "Starting export"
        );
    };
}

/// Log the completion of an export
///
/// # Example
///
/// ```no_run
/// use compendium::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(42, Duration::from_millis(350));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            definitions = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export assembled"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use compendium::log_error_with_context;
/// use compendium::domain::CompendiumError;
///
/// let error = CompendiumError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
