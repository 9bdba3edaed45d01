//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CompendiumConfig;
use super::secret_string;
use crate::domain::errors::CompendiumError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "COMPENDIUM";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CompendiumConfig`]
/// 4. Applies environment variable overrides (`COMPENDIUM_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - An override has an unparseable value
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use compendium::config::loader::load_config;
///
/// let config = load_config("compendium.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CompendiumConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CompendiumError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CompendiumError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str) -> Result<CompendiumConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CompendiumConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CompendiumError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CompendiumError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }

            re.replace_all(line, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(CompendiumError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the `COMPENDIUM_*` prefix
///
/// Environment variables follow the pattern `COMPENDIUM_<SECTION>_<KEY>`,
/// for example `COMPENDIUM_STORE_ROOT` or `COMPENDIUM_EXPORT_RESOLVE_CONCURRENCY`.
fn apply_env_overrides(config: &mut CompendiumConfig) -> Result<()> {
    // Application
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_override("APPLICATION_SERVICE_NAME") {
        config.application.service_name = val;
    }

    // Store
    if let Some(val) = env_override("STORE_ROOT") {
        config.store.root = val;
    }

    // Export
    if let Some(val) = env_override("EXPORT_RESOLVE_CONCURRENCY") {
        config.export.resolve_concurrency = parse_override("EXPORT_RESOLVE_CONCURRENCY", &val)?;
    }
    if let Some(val) = env_override("EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = env_override("EXPORT_PRETTY") {
        config.export.pretty = parse_override("EXPORT_PRETTY", &val)?;
    }

    // Notifier
    if let Some(val) = env_override("NOTIFIER_WEBHOOK_ENABLED") {
        config.notifier.webhook_enabled = parse_override("NOTIFIER_WEBHOOK_ENABLED", &val)?;
    }
    if let Some(val) = env_override("NOTIFIER_WEBHOOK_URL") {
        config.notifier.webhook_url = Some(val);
    }
    if let Some(val) = env_override("NOTIFIER_WEBHOOK_TOKEN") {
        config.notifier.webhook_token = Some(secret_string(val));
    }
    if let Some(val) = env_override("NOTIFIER_TIMEOUT_SECONDS") {
        config.notifier.timeout_seconds = parse_override("NOTIFIER_TIMEOUT_SECONDS", &val)?;
    }

    // Logging
    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CompendiumError::Configuration(format!(
            "Invalid value '{value}' for {ENV_PREFIX}_{key}"
        ))
    })
}
