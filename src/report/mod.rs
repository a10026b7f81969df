//! @ai:module:intent Report generation for the operations dashboard
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator, display helpers

pub mod charts;
pub mod display;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait, BILLING_CHART, ISSUES_CHART};
pub use display::{
    billing_rows, display_slots, format_minutes, issue_rows, summary_rows, DisplaySlot,
    BILLING_COLUMNS, ISSUE_COLUMNS,
};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::DashboardReport;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const JSON_REPORT: &str = "dashboard.json";
pub const MARKDOWN_REPORT: &str = "dashboard.md";

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Generate all reports, returning the paths written
    /// @ai:effects fs:write
    pub fn generate_all(&self, report: &DashboardReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_dir)?;

        let json_path = output_dir.join(JSON_REPORT);
        self.json.generate(report, &json_path)?;
        let markdown_path = output_dir.join(MARKDOWN_REPORT);
        self.markdown.generate(report, &markdown_path)?;

        let mut written = vec![json_path, markdown_path];
        written.extend(
            self.charts
                .generate_all(report, output_dir)?
                .into_iter()
                .map(|file| output_dir.join(file)),
        );

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(written)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MonthlySeries, SlaTargets, Summary};
    use tempfile::TempDir;

    #[test]
    fn test_generate_all_reports() {
        let temp = TempDir::new().unwrap();
        let series = MonthlySeries {
            labels: vec!["Jul 2025".to_string()],
            counts: vec![1],
        };
        let report = DashboardReport {
            timestamp: "2025-09-01T00:00:00.000Z".to_string(),
            targets: SlaTargets::default(),
            summary: Summary::default(),
            issues_by_month: series.clone(),
            billing_by_month: series,
            pending_writes: 0,
        };

        let written = ReportGenerator::new()
            .generate_all(&report, temp.path())
            .unwrap();

        assert_eq!(written.len(), 4);
        for path in written {
            assert!(path.exists(), "{} missing", path.display());
        }
    }
}
