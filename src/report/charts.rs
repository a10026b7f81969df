//! @ai:module:intent Monthly volume bar charts for the dashboard
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait, ISSUES_CHART, BILLING_CHART
//! @ai:module:stateless true

use crate::metrics::{DashboardReport, MonthlySeries};
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

pub const ISSUES_CHART: &str = "issues_by_month.png";
pub const BILLING_CHART: &str = "billing_by_month.png";

const ISSUES_COLOR: RGBColor = RGBColor(54, 162, 235);
const BILLING_COLOR: RGBColor = RGBColor(75, 192, 192);

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts for a report, returning the written file names
    fn generate_all(&self, report: &DashboardReport, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Renders the month series of a report as PNG bar charts
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Draw one bar per month, labelled on the x axis
    /// @ai:pre series is non-empty
    /// @ai:effects fs:write
    fn generate_month_chart(
        &self,
        series: &MonthlySeries,
        caption: &str,
        color: RGBColor,
        output_path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let months = series.counts.len() as u32;
        let y_max = series.max_count() + 1;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..months).into_segmented(), 0u32..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Count")
            .x_desc("Month")
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => series
                    .labels
                    .get(*i as usize)
                    .cloned()
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color.mix(0.7).filled())
                .margin(10)
                .data(
                    series
                        .counts
                        .iter()
                        .enumerate()
                        .map(|(i, count)| (i as u32, *count)),
                ),
        )?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate the issues and billing charts; empty windows produce no chart
    /// @ai:effects fs:write
    fn generate_all(&self, report: &DashboardReport, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();
        let charts = [
            (&report.issues_by_month, "Issues per Month", ISSUES_COLOR, ISSUES_CHART),
            (&report.billing_by_month, "Billing Corrections per Month", BILLING_COLOR, BILLING_CHART),
        ];

        for (series, caption, color, file) in charts {
            if series.counts.is_empty() {
                tracing::warn!("Skipping {}: month window is empty", file);
                continue;
            }
            self.generate_month_chart(series, caption, color, &output_dir.join(file))?;
            generated.push(file.to_string());
        }

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{SlaTargets, Summary};
    use tempfile::TempDir;

    fn series(counts: Vec<u32>) -> MonthlySeries {
        let labels = ["Jul 2025", "Aug 2025", "Sep 2025"]
            .iter()
            .take(counts.len())
            .map(|s| s.to_string())
            .collect();
        MonthlySeries { labels, counts }
    }

    fn create_test_report(issues: Vec<u32>, billing: Vec<u32>) -> DashboardReport {
        DashboardReport {
            timestamp: "2025-09-01T00:00:00.000Z".to_string(),
            targets: SlaTargets::default(),
            summary: Summary::default(),
            issues_by_month: series(issues),
            billing_by_month: series(billing),
            pending_writes: 0,
        }
    }

    #[test]
    fn test_generate_all_charts() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let report = create_test_report(vec![3, 0, 5], vec![1, 2, 0]);

        let files = generator.generate_all(&report, temp.path()).unwrap();

        assert_eq!(files, vec![ISSUES_CHART.to_string(), BILLING_CHART.to_string()]);
        assert!(temp.path().join(ISSUES_CHART).exists());
        assert!(temp.path().join(BILLING_CHART).exists());
    }

    #[test]
    fn test_all_zero_counts_still_render() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let report = create_test_report(vec![0, 0, 0], vec![0, 0, 0]);

        let files = generator.generate_all(&report, temp.path()).unwrap();

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_empty_window_skips_chart() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let report = create_test_report(vec![], vec![4]);

        let files = generator.generate_all(&report, temp.path()).unwrap();

        assert_eq!(files, vec![BILLING_CHART.to_string()]);
        assert!(!temp.path().join(ISSUES_CHART).exists());
    }
}
