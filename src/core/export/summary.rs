//! Export summary and reporting

use crate::core::export::assembler::AssemblyStats;
use crate::domain::TenantId;
use std::time::Duration;

/// Summary of a successful export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Tenant the export was produced for
    pub tenant: TenantId,

    /// Number of applications processed
    pub total_applications: usize,

    /// IDs referenced across all applications, duplicates included
    pub ids_referenced: usize,

    /// Definitions in the document
    pub definitions_exported: usize,

    /// References that pointed at an already collected definition
    pub duplicates_skipped: usize,

    /// Wall-clock duration of the export
    pub duration: Duration,

    /// SHA-256 of the canonical JSON document
    pub checksum: String,
}

impl ExportSummary {
    /// Build a summary from assembly counters
    pub fn new(tenant: TenantId, stats: &AssemblyStats, checksum: String) -> Self {
        Self {
            tenant,
            total_applications: stats.applications,
            ids_referenced: stats.ids_referenced,
            definitions_exported: stats.definitions_resolved,
            duplicates_skipped: stats.duplicates_skipped,
            duration: Duration::from_secs(0),
            checksum,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Share of references that were duplicates, as a percentage
    pub fn duplicate_rate(&self) -> f64 {
        if self.ids_referenced == 0 {
            return 0.0;
        }
        (self.duplicates_skipped as f64 / self.ids_referenced as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            tenant = %self.tenant,
            applications = self.total_applications,
            ids_referenced = self.ids_referenced,
            definitions = self.definitions_exported,
            duplicates_skipped = self.duplicates_skipped,
            duplicate_rate = format!("{:.2}%", self.duplicate_rate()),
            duration_ms = self.duration.as_millis() as u64,
            checksum = %self.checksum,
            "Export completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> AssemblyStats {
        AssemblyStats {
            applications: 2,
            ids_referenced: 8,
            definitions_resolved: 6,
            duplicates_skipped: 2,
        }
    }

    #[test]
    fn test_summary_from_stats() {
        let summary = ExportSummary::new(TenantId::new("acme").unwrap(), &stats(), "abc".into())
            .with_duration(Duration::from_millis(1500));

        assert_eq!(summary.total_applications, 2);
        assert_eq!(summary.ids_referenced, 8);
        assert_eq!(summary.definitions_exported, 6);
        assert_eq!(summary.duplicates_skipped, 2);
        assert_eq!(summary.duration, Duration::from_millis(1500));
        assert_eq!(summary.checksum, "abc");
    }

    #[test]
    fn test_duplicate_rate() {
        let summary = ExportSummary::new(TenantId::new("acme").unwrap(), &stats(), String::new());
        assert_eq!(summary.duplicate_rate(), 25.0);

        let empty = ExportSummary::new(
            TenantId::new("acme").unwrap(),
            &AssemblyStats::default(),
            String::new(),
        );
        assert_eq!(empty.duplicate_rate(), 0.0);
    }
}
