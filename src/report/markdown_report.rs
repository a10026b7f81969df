//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{DashboardReport, DomainSummary};
use crate::report::display::{display_slots, format_minutes};
use crate::report::charts::{BILLING_CHART, ISSUES_CHART};
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a dashboard report
    fn generate(&self, report: &DashboardReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders the dashboard report as a Markdown document
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Share of resolved records that met the target, as a percentage
    /// @ai:effects pure
    fn format_rate(domain: &DomainSummary) -> String {
        if domain.resolved == 0 {
            return "-".to_string();
        }
        format!(
            "{:.1}%",
            domain.in_target as f64 * 100.0 / domain.resolved as f64
        )
    }

    fn write_header(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
        writeln!(out, "# Operations Dashboard")?;
        writeln!(out)?;
        writeln!(out, "**Generated:** {}", report.timestamp)?;
        if report.pending_writes > 0 {
            writeln!(out)?;
            writeln!(
                out,
                "> **Offline:** {} write(s) queued locally and not yet synced.",
                report.pending_writes
            )?;
        }
        writeln!(out)
    }

    fn write_summary(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
        let issues = &report.summary.issues;
        let billing = &report.summary.billing;

        writeln!(out, "## Summary")?;
        writeln!(out)?;
        writeln!(out, "| Metric | Issues | Billing |")?;
        writeln!(out, "|--------|--------|---------|")?;
        writeln!(out, "| Total | {} | {} |", issues.total, billing.total)?;
        writeln!(out, "| Resolved | {} | {} |", issues.resolved, billing.resolved)?;
        writeln!(
            out,
            "| Avg resolution | {} | {} |",
            format_minutes(issues.avg_resolution_minutes),
            format_minutes(billing.avg_resolution_minutes)
        )?;
        writeln!(
            out,
            "| Target | {} | {} |",
            format_minutes(report.targets.issue_minutes),
            format_minutes(report.targets.billing_minutes)
        )?;
        writeln!(
            out,
            "| Within target | {} | {} |",
            issues.in_target, billing.in_target
        )?;
        writeln!(
            out,
            "| Within target rate | {} | {} |",
            Self::format_rate(issues),
            Self::format_rate(billing)
        )?;
        writeln!(out)
    }

    fn write_slots(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
        writeln!(out, "## Display Values")?;
        writeln!(out)?;
        writeln!(out, "| Slot | Value |")?;
        writeln!(out, "|------|-------|")?;
        for slot in display_slots(&report.summary) {
            writeln!(out, "| `{}` | {} |", slot.id, slot.value)?;
        }
        writeln!(out)
    }

    fn write_monthly(out: &mut String, report: &DashboardReport) -> std::fmt::Result {
        writeln!(out, "## Monthly Volume")?;
        writeln!(out)?;
        writeln!(out, "| Month | Issues | Billing |")?;
        writeln!(out, "|-------|--------|---------|")?;
        for ((label, issues), (_, billing)) in report
            .issues_by_month
            .iter()
            .zip(report.billing_by_month.iter())
        {
            writeln!(out, "| {} | {} | {} |", label, issues, billing)?;
        }
        writeln!(out)?;
        writeln!(out, "![Issues per month]({})", ISSUES_CHART)?;
        writeln!(out)?;
        writeln!(out, "![Billing corrections per month]({})", BILLING_CHART)
    }

    /// @ai:intent Render the whole document
    /// @ai:effects pure
    pub fn render(report: &DashboardReport) -> Result<String> {
        let mut out = String::new();
        Self::write_header(&mut out, report)?;
        Self::write_summary(&mut out, report)?;
        Self::write_slots(&mut out, report)?;
        Self::write_monthly(&mut out, report)?;
        Ok(out)
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &DashboardReport, output_path: &Path) -> Result<()> {
        let content = Self::render(report)?;
        std::fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MonthlySeries, SlaTargets, Summary};
    use tempfile::TempDir;

    fn create_test_report(pending_writes: usize) -> DashboardReport {
        DashboardReport {
            timestamp: "2025-09-01T00:00:00.000Z".to_string(),
            targets: SlaTargets::default(),
            summary: Summary {
                issues: DomainSummary {
                    total: 5,
                    resolved: 4,
                    avg_resolution_minutes: 27,
                    in_target: 3,
                },
                billing: DomainSummary {
                    total: 2,
                    resolved: 0,
                    avg_resolution_minutes: 0,
                    in_target: 0,
                },
            },
            issues_by_month: MonthlySeries {
                labels: vec!["Jul 2025".to_string(), "Aug 2025".to_string()],
                counts: vec![2, 3],
            },
            billing_by_month: MonthlySeries {
                labels: vec!["Jul 2025".to_string(), "Aug 2025".to_string()],
                counts: vec![0, 2],
            },
            pending_writes,
        }
    }

    #[test]
    fn test_render_sections() {
        let content = MarkdownReporter::render(&create_test_report(0)).unwrap();

        assert!(content.contains("# Operations Dashboard"));
        assert!(content.contains("| Avg resolution | 27min | 0min |"));
        assert!(content.contains("| Target | 30min | 5min |"));
        assert!(content.contains("| Within target rate | 75.0% | - |"));
        assert!(content.contains("| `avg-resolve-time` | 27min |"));
        assert!(content.contains("| Aug 2025 | 3 | 2 |"));
        assert!(!content.contains("Offline"));
    }

    #[test]
    fn test_pending_writes_banner() {
        let content = MarkdownReporter::render(&create_test_report(2)).unwrap();
        assert!(content.contains("2 write(s) queued locally"));
    }

    #[test]
    fn test_generate_markdown_file() {
        let reporter = MarkdownReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("dashboard.md");

        reporter.generate(&create_test_report(0), &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("## Monthly Volume"));
    }
}
