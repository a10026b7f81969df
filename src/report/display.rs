//! @ai:module:intent Presentation formatting: display slots and record list rows
//! @ai:module:layer presentation
//! @ai:module:public_api DisplaySlot, display_slots, format_minutes, summary_rows, issue_rows, billing_rows
//! @ai:module:stateless true

use crate::metrics::{resolution_minutes, SlaTargets, Summary};
use crate::records::{amount_label, reason_label, Record, RecordKind};
use chrono::NaiveDate;

pub const ISSUE_COLUMNS: [&str; 7] = [
    "Date",
    "Reporter",
    "Department",
    "Title",
    "Description",
    "Status",
    "Resolution",
];

pub const BILLING_COLUMNS: [&str; 7] = [
    "Date",
    "Patient",
    "Bill No",
    "Amount",
    "Reason",
    "Status",
    "Resolution",
];

/// @ai:intent One named number on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySlot {
    pub id: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// @ai:intent Minute-suffixed duration, e.g. "12min"
/// @ai:effects pure
pub fn format_minutes(minutes: u64) -> String {
    format!("{}min", minutes)
}

/// @ai:intent The eight summary numbers as named, formatted slots
/// @ai:effects pure
pub fn display_slots(summary: &Summary) -> Vec<DisplaySlot> {
    let slot = |id, label, value: String| DisplaySlot { id, label, value };

    vec![
        slot("total-issues", "Total issues", summary.issues.total.to_string()),
        slot("resolved-issues", "Resolved issues", summary.issues.resolved.to_string()),
        slot("total-billing", "Total billing corrections", summary.billing.total.to_string()),
        slot("approved-billing", "Resolved billing corrections", summary.billing.resolved.to_string()),
        slot(
            "avg-resolve-time",
            "Avg issue resolution",
            format_minutes(summary.issues.avg_resolution_minutes),
        ),
        slot("resolved-in-target", "Issues within target", summary.issues.in_target.to_string()),
        slot(
            "billing-resolve-time",
            "Avg billing resolution",
            format_minutes(summary.billing.avg_resolution_minutes),
        ),
        slot("billing-in-target", "Billing within target", summary.billing.in_target.to_string()),
    ]
}

/// @ai:intent Side-by-side issues/billing rows for the terminal summary
/// @ai:effects pure
pub fn summary_rows(summary: &Summary, targets: SlaTargets) -> Vec<[String; 3]> {
    let (issues, billing) = (&summary.issues, &summary.billing);
    let row = |label: &str, i: String, b: String| [label.to_string(), i, b];

    vec![
        row("Total:", issues.total.to_string(), billing.total.to_string()),
        row("Resolved:", issues.resolved.to_string(), billing.resolved.to_string()),
        row(
            "Avg resolution:",
            format_minutes(issues.avg_resolution_minutes),
            format_minutes(billing.avg_resolution_minutes),
        ),
        row(
            "Target:",
            format_minutes(targets.issue_minutes),
            format_minutes(targets.billing_minutes),
        ),
        row("Within target:", issues.in_target.to_string(), billing.in_target.to_string()),
    ]
}

/// @ai:intent Resolution column: minutes once a resolution time exists, "-" otherwise
/// @ai:effects pure
fn resolution_cell(record: &Record) -> String {
    if record.resolved_at_raw().is_some() {
        format_minutes(resolution_minutes(Some(record)))
    } else {
        "-".to_string()
    }
}

fn status_cell(record: &Record, kind: RecordKind) -> String {
    record
        .status()
        .filter(|s| !s.is_empty())
        .unwrap_or(kind.default_status_label())
        .to_string()
}

/// @ai:intent Table rows for the issues list, in store order
/// @ai:effects pure
pub fn issue_rows(records: &[Record]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.text_or_empty("date"),
                r.text_or_empty("reporter"),
                r.text_or_empty("department"),
                r.text_or_empty("title"),
                r.text_or_empty("description"),
                status_cell(r, RecordKind::Issues),
                resolution_cell(r),
            ]
        })
        .collect()
}

/// @ai:intent Table rows for the billing list; a missing bill date shows `today`
/// @ai:effects pure
pub fn billing_rows(records: &[Record], today: NaiveDate) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            let date = r
                .text("billDate")
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| today.format("%-m/%-d/%Y").to_string());

            vec![
                date,
                r.text_or_empty("patientName"),
                r.text_or_empty("billNo"),
                amount_label(r),
                reason_label(r),
                status_cell(r, RecordKind::Billing),
                resolution_cell(r),
            ]
        })
        .collect()
}
