//! CLI command implementations

pub mod export;
pub mod init;
pub mod inspect;
pub mod validate;

use crate::config::{load_config, CompendiumConfig};

/// Load configuration, reporting failures the way every command does
///
/// Returns the exit code to use when loading fails.
pub(crate) fn load_or_report(config_path: &str) -> Result<CompendiumConfig, i32> {
    load_config(config_path).map_err(|e| {
        tracing::error!(config_path = %config_path, error = %e, "Failed to load configuration");
        eprintln!("❌ Failed to load configuration: {e}");
        2
    })
}
