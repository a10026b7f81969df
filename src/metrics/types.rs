//! @ai:module:intent Metric types produced for the dashboard
//! @ai:module:layer domain
//! @ai:module:public_api Summary, DomainSummary, SlaTargets, MonthlySeries, Snapshot, DashboardReport
//! @ai:module:stateless true

use crate::metrics::engine::{BILLING_TARGET_MINUTES, ISSUE_TARGET_MINUTES};
use crate::records::{Record, RecordKind};
use serde::{Deserialize, Serialize};

/// @ai:intent Per-domain SLA thresholds in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaTargets {
    #[serde(default = "default_issue_minutes")]
    pub issue_minutes: u64,
    #[serde(default = "default_billing_minutes")]
    pub billing_minutes: u64,
}

impl SlaTargets {
    /// @ai:intent Threshold that applies to a record kind
    /// @ai:effects pure
    pub fn for_kind(&self, kind: RecordKind) -> u64 {
        match kind {
            RecordKind::Issues => self.issue_minutes,
            RecordKind::Billing => self.billing_minutes,
        }
    }
}

impl Default for SlaTargets {
    fn default() -> Self {
        Self {
            issue_minutes: ISSUE_TARGET_MINUTES,
            billing_minutes: BILLING_TARGET_MINUTES,
        }
    }
}

fn default_issue_minutes() -> u64 {
    ISSUE_TARGET_MINUTES
}

fn default_billing_minutes() -> u64 {
    BILLING_TARGET_MINUTES
}

/// @ai:intent Counts and resolution timing for one record collection
/// @ai:invariant in_target <= resolved <= total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub total: usize,
    pub resolved: usize,
    pub avg_resolution_minutes: u64,
    pub in_target: usize,
}

/// @ai:intent The eight dashboard numbers, recomputed from scratch on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub issues: DomainSummary,
    pub billing: DomainSummary,
}

impl Summary {
    pub fn domain(&self, kind: RecordKind) -> &DomainSummary {
        match kind {
            RecordKind::Issues => &self.issues,
            RecordKind::Billing => &self.billing,
        }
    }
}

/// @ai:intent Record counts bucketed by creation month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub counts: Vec<u32>,
}

impl MonthlySeries {
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

/// @ai:intent Both record collections as fetched at one point in time
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub issues: Vec<Record>,
    pub billing: Vec<Record>,
    /// Writes queued in the offline journal and not yet applied remotely
    pub pending_writes: usize,
}

impl Snapshot {
    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Issues => &self.issues,
            RecordKind::Billing => &self.billing,
        }
    }
}

/// @ai:intent Everything the dashboard renders, as written to report files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub timestamp: String,
    pub targets: SlaTargets,
    pub summary: Summary,
    pub issues_by_month: MonthlySeries,
    pub billing_by_month: MonthlySeries,
    #[serde(default)]
    pub pending_writes: usize,
}
