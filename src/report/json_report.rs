//! @ai:module:intent Machine-readable dashboard snapshot (dashboard.json)
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReporterTrait
//! @ai:module:stateless true

use crate::metrics::DashboardReport;
use anyhow::{Context, Result};
use std::path::Path;

pub trait JsonReporterTrait: Send + Sync {
    fn generate(&self, report: &DashboardReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Serialises the full report: summary, targets, month series and backlog
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Pretty JSON with a trailing newline
    /// @ai:effects pure
    pub fn render(report: &DashboardReport) -> Result<String> {
        let mut json = serde_json::to_string_pretty(report)?;
        json.push('\n');
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn generate(&self, report: &DashboardReport, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render(report)?)
            .with_context(|| format!("Failed to write {}", output_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DomainSummary, MonthlySeries, SlaTargets, Summary};
    use tempfile::TempDir;

    fn sample_report() -> DashboardReport {
        DashboardReport {
            timestamp: "2025-09-01T00:00:00.000Z".to_string(),
            targets: SlaTargets::default(),
            summary: Summary {
                issues: DomainSummary {
                    total: 4,
                    resolved: 3,
                    avg_resolution_minutes: 22,
                    in_target: 2,
                },
                billing: DomainSummary::default(),
            },
            issues_by_month: MonthlySeries {
                labels: vec!["Aug 2025".to_string()],
                counts: vec![4],
            },
            billing_by_month: MonthlySeries::default(),
            pending_writes: 1,
        }
    }

    #[test]
    fn test_render_field_names() {
        let value: serde_json::Value =
            serde_json::from_str(&JsonReporter::render(&sample_report()).unwrap()).unwrap();

        assert_eq!(value["summary"]["issues"]["avg_resolution_minutes"], 22);
        assert_eq!(value["targets"]["billing_minutes"], 5);
        assert_eq!(value["issues_by_month"]["labels"][0], "Aug 2025");
        assert_eq!(value["pending_writes"], 1);
    }

    #[test]
    fn test_generate_reads_back() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("dashboard.json");
        let report = sample_report();

        JsonReporter::new().generate(&report, &output).unwrap();

        let parsed: DashboardReport =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(parsed.summary, report.summary);
        assert!(std::fs::read_to_string(&output).unwrap().ends_with('\n'));
    }

    #[test]
    fn test_generate_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("absent").join("dashboard.json");
        assert!(JsonReporter::new().generate(&sample_report(), &output).is_err());
    }
}
