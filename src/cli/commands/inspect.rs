//! Inspect command implementation
//!
//! Lists a tenant's applications with the number of definition IDs each one
//! references, without resolving any definitions.

use super::load_or_report;
use crate::adapters::filestore::FileStore;
use crate::adapters::traits::TenantContextProvider;
use crate::domain::ExportRequest;
use clap::Args;
use std::collections::HashSet;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Tenant to inspect
    #[arg(short, long)]
    pub tenant: String,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(tenant = %self.tenant, "Inspecting tenant");

        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let store = FileStore::new(&config.store.root);
        let request = ExportRequest::new(&self.tenant);

        let context = match store.resolve(&request).await {
            Ok(context) => context,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(4);
            }
        };

        let applications = match context.applications().await {
            Ok(applications) => applications,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(4);
            }
        };

        println!("📋 Tenant: {}", context.tenant());
        println!();

        let mut distinct = HashSet::new();
        let mut referenced = 0usize;
        let mut failed = false;

        for application in &applications {
            match application.export_ids().await {
                Ok(ids) => {
                    println!(
                        "  {} ({}): {} IDs",
                        application.id(),
                        application.name(),
                        ids.len()
                    );
                    referenced += ids.len();
                    distinct.extend(ids);
                }
                Err(e) => {
                    println!("  {} ({}): ❌ {}", application.id(), application.name(), e);
                    failed = true;
                }
            }
        }

        println!();
        println!("  Applications: {}", applications.len());
        println!("  IDs Referenced: {referenced}");
        println!("  Distinct Definitions: {}", distinct.len());

        Ok(if failed { 1 } else { 0 })
    }
}
