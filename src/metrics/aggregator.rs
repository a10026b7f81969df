//! @ai:module:intent Month bucketing and assembly of the dashboard report
//! @ai:module:layer application
//! @ai:module:public_api MonthWindow, monthly_counts, DashboardAggregator
//! @ai:module:stateless true

use crate::metrics::engine::compute_summary_with_targets;
use crate::metrics::types::{DashboardReport, MonthlySeries, SlaTargets, Snapshot};
use crate::records::Record;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ten years of monthly buckets.
pub const MAX_WINDOW_MONTHS: u32 = 120;

/// @ai:intent A run of consecutive calendar months used as chart buckets
/// @ai:invariant 1 <= month <= 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    year: i32,
    month: u32,
    months: u32,
}

impl MonthWindow {
    /// @ai:intent Window of `months` months beginning at year/month
    /// @ai:post None when month is outside 1..=12 or months exceeds MAX_WINDOW_MONTHS
    /// @ai:effects pure
    pub fn starting(year: i32, month: u32, months: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || months > MAX_WINDOW_MONTHS {
            return None;
        }

        Some(Self {
            year,
            month,
            months,
        })
    }

    /// @ai:intent Window of `months` months ending with the month containing `today`
    /// @ai:post at most MAX_WINDOW_MONTHS months
    /// @ai:effects pure
    pub fn trailing(today: NaiveDate, months: u32) -> Self {
        let months = months.min(MAX_WINDOW_MONTHS);
        let end = month_index(today.year(), today.month());
        let start = end - i64::from(months.saturating_sub(1));
        let (year, month) = from_month_index(start);

        Self {
            year,
            month,
            months,
        }
    }

    /// @ai:intent Parse a "YYYY-MM" start month
    /// @ai:effects pure
    pub fn parse_start(start: &str, months: u32) -> Option<Self> {
        let (year, month) = start.trim().split_once('-')?;
        Self::starting(year.parse().ok()?, month.parse().ok()?, months)
    }

    pub fn len(&self) -> usize {
        self.months as usize
    }

    pub fn is_empty(&self) -> bool {
        self.months == 0
    }

    /// @ai:intent Chart labels such as "Jul 2025"
    /// @ai:effects pure
    pub fn labels(&self) -> Vec<String> {
        (0..self.months)
            .filter_map(|offset| {
                let (year, month) = from_month_index(self.first_index() + i64::from(offset));
                NaiveDate::from_ymd_opt(year, month, 1)
            })
            .map(|date| date.format("%b %Y").to_string())
            .collect()
    }

    /// @ai:intent Bucket position of a calendar month, None when outside the window
    /// @ai:effects pure
    pub fn position(&self, year: i32, month: u32) -> Option<usize> {
        let offset = month_index(year, month) - self.first_index();

        if offset >= 0 && offset < i64::from(self.months) {
            Some(offset as usize)
        } else {
            None
        }
    }

    fn first_index(&self) -> i64 {
        month_index(self.year, self.month)
    }
}

impl Default for MonthWindow {
    fn default() -> Self {
        Self {
            year: 2025,
            month: 7,
            months: 6,
        }
    }
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

fn from_month_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

/// @ai:intent Count records per creation month within a window
/// @ai:post records without a parseable creation instant, or outside the window, are skipped
/// @ai:effects pure
pub fn monthly_counts(records: &[Record], window: &MonthWindow) -> MonthlySeries {
    let mut counts = vec![0u32; window.len()];

    for created in records.iter().filter_map(Record::created_at) {
        if let Some(slot) = window.position(created.year(), created.month()) {
            counts[slot] += 1;
        }
    }

    MonthlySeries {
        labels: window.labels(),
        counts,
    }
}

/// @ai:intent Trait for building the dashboard report from a snapshot
pub trait DashboardAggregatorTrait: Send + Sync {
    /// @ai:intent Compute summary and monthly series for a snapshot
    fn build(&self, snapshot: &Snapshot, window: &MonthWindow, targets: SlaTargets) -> DashboardReport;
}

/// @ai:intent Combines the summary engine and month bucketing into one report
pub struct DashboardAggregator;

impl DashboardAggregator {
    /// @ai:intent Create a new aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for DashboardAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardAggregatorTrait for DashboardAggregator {
    /// @ai:intent Build a report stamped with the current time
    /// @ai:effects time
    fn build(&self, snapshot: &Snapshot, window: &MonthWindow, targets: SlaTargets) -> DashboardReport {
        DashboardReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            targets,
            summary: compute_summary_with_targets(&snapshot.issues, &snapshot.billing, targets),
            issues_by_month: monthly_counts(&snapshot.issues, window),
            billing_by_month: monthly_counts(&snapshot.billing, window),
            pending_writes: snapshot.pending_writes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn created(at: &str) -> Record {
        Record::new().with("createdAt", at)
    }

    #[test]
    fn test_default_window_labels() {
        let labels = MonthWindow::default().labels();
        assert_eq!(
            labels,
            vec!["Jul 2025", "Aug 2025", "Sep 2025", "Oct 2025", "Nov 2025", "Dec 2025"]
        );
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let window = MonthWindow::starting(2025, 11, 4).unwrap();
        assert_eq!(window.labels(), vec!["Nov 2025", "Dec 2025", "Jan 2026", "Feb 2026"]);
        assert_eq!(window.position(2026, 2), Some(3));
        assert_eq!(window.position(2026, 3), None);
        assert_eq!(window.position(2025, 10), None);
    }

    #[test]
    fn test_trailing_window_ends_at_today() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let window = MonthWindow::trailing(today, 3);
        assert_eq!(window.labels(), vec!["Dec 2025", "Jan 2026", "Feb 2026"]);
    }

    #[test]
    fn test_parse_start() {
        assert_eq!(MonthWindow::parse_start("2025-07", 6), Some(MonthWindow::default()));
        assert_eq!(MonthWindow::parse_start("2025-13", 6), None);
        assert_eq!(MonthWindow::parse_start("July", 6), None);
    }

    #[test]
    fn test_window_size_is_bounded() {
        assert_eq!(MonthWindow::starting(2025, 7, MAX_WINDOW_MONTHS + 1), None);
        assert!(MonthWindow::starting(2025, 7, MAX_WINDOW_MONTHS).is_some());

        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let window = MonthWindow::trailing(today, u32::MAX);
        assert_eq!(window.len(), MAX_WINDOW_MONTHS as usize);

        let series = monthly_counts(&[created("2026-02-01T00:00:00Z")], &window);
        assert_eq!(series.counts.len(), series.labels.len());
        assert_eq!(series.counts.last(), Some(&1));
    }

    #[test]
    fn test_monthly_counts() {
        let records = vec![
            created("2025-07-03T10:00:00Z"),
            created("2025-07-28T10:00:00Z"),
            created("2025-09-01T00:00:00Z"),
            created("2024-12-01T00:00:00Z"),
            created("garbage"),
            Record::new(),
        ];

        let series = monthly_counts(&records, &MonthWindow::default());

        assert_eq!(series.counts, vec![2, 0, 1, 0, 0, 0]);
        assert_eq!(series.labels.len(), 6);
    }

    #[test]
    fn test_build_report() {
        let snapshot = Snapshot {
            issues: vec![created("2025-08-02T00:00:00Z")
                .with("status", "Resolved")
                .with("resolveTime", "2025-08-02T00:10:00Z")],
            billing: vec![created("2025-12-31T23:00:00Z")],
            pending_writes: 2,
        };

        let report = DashboardAggregator::new().build(
            &snapshot,
            &MonthWindow::default(),
            SlaTargets::default(),
        );

        assert_eq!(report.summary.issues.in_target, 1);
        assert_eq!(report.summary.billing.total, 1);
        assert_eq!(report.issues_by_month.counts, vec![0, 1, 0, 0, 0, 0]);
        assert_eq!(report.billing_by_month.counts, vec![0, 0, 0, 0, 0, 1]);
        assert_eq!(report.pending_writes, 2);
    }
}
