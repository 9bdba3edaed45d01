//! Validate config command implementation

use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Service Name: {}", config.application.service_name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Store Root: {}", config.store.root);
        if !Path::new(&config.store.root).is_dir() {
            println!("  ⚠️  Store root does not exist yet");
        }
        println!("  Resolve Concurrency: {}", config.export.resolve_concurrency);
        println!("  Output Directory: {}", config.export.output_dir);
        println!(
            "  Webhook Notifier: {}",
            match (
                config.notifier.webhook_enabled,
                config.notifier.webhook_url.as_deref()
            ) {
                (true, Some(url)) => url,
                _ => "disabled",
            }
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[export]\nresolve_concurrency = 2").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlocal_rotation = \"weekly\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("does-not-exist-compendium.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
