//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "compendium.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [store] root at your definition store");
                println!("  2. Validate configuration: compendium validate-config");
                println!("  3. Run an export: compendium export --tenant <name>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn sample_config() -> &'static str {
        r#"# Compendium Configuration File

[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# Service name reported with operator notifications
service_name = "compendium"

[store]
# One directory per tenant:
#   <root>/<tenant>/applications/<app>.json
#   <root>/<tenant>/definitions/<id>.json
root = "./data"

[export]
# Definitions resolved at once (1 = strictly sequential)
resolve_concurrency = 1

# Where attachment downloads are written
output_dir = "./exports"

pretty = false

[notifier]
# Operator notifications always go to the log; optionally also to a webhook
webhook_enabled = false
# webhook_url = "https://hooks.example.com/compendium"
# webhook_token = "${COMPENDIUM_WEBHOOK_TOKEN}"
timeout_seconds = 10

[logging]
# JSON file logs in addition to the console
local_enabled = false
local_path = "./logs"

# Rotation: daily | hourly | never
local_rotation = "daily"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_parses() {
        let config = parse_config(InitArgs::sample_config()).unwrap();
        assert_eq!(config.store.root, "./data");
        assert_eq!(config.export.resolve_concurrency, 1);
        assert!(!config.notifier.webhook_enabled);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("compendium.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let forced = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: true,
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[store]"));
    }
}
