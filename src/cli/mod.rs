//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Compendium using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Compendium - tenant-wide definition export
#[derive(Parser, Debug)]
#[command(name = "compendium")]
#[command(version, about, long_about = None)]
#[command(author = "Compendium Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "compendium.toml", env = "COMPENDIUM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COMPENDIUM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every definition referenced by a tenant's applications
    Export(commands::export::ExportArgs),

    /// List a tenant's applications and their referenced definitions
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
