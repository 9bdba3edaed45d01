//! Configuration management for Compendium.
//!
//! # Overview
//!
//! Compendium reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COMPENDIUM_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use compendium::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("compendium.toml")?;
//! println!("Store root: {}", config.store.root);
//! println!("Concurrency: {}", config.export.resolve_concurrency);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and service name
//! - [`StoreConfig`] - Definition store root
//! - [`ExportConfig`] - Resolver concurrency and output settings
//! - [`NotifierConfig`] - Operator webhook
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! root = "/var/lib/compendium"
//!
//! [export]
//! resolve_concurrency = 4
//! output_dir = "./exports"
//!
//! [notifier]
//! webhook_enabled = true
//! webhook_url = "https://hooks.example.com/compendium"
//! webhook_token = "${COMPENDIUM_WEBHOOK_TOKEN}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CompendiumConfig, ExportConfig, LoggingConfig, NotifierConfig, StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
