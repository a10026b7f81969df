//! @ai:module:intent Resolution-time arithmetic and the eight-number dashboard summary
//! @ai:module:layer domain
//! @ai:module:public_api resolution_minutes, average_minutes, compute_summary
//! @ai:module:stateless true

use crate::metrics::types::{DomainSummary, SlaTargets, Summary};
use crate::records::Record;

/// SLA threshold for application issues.
pub const ISSUE_TARGET_MINUTES: u64 = 30;

/// SLA threshold for billing corrections.
pub const BILLING_TARGET_MINUTES: u64 = 5;

const MILLIS_PER_MINUTE: u64 = 60_000;

/// @ai:intent Minutes between creation and resolution of a record
/// @ai:post result >= 0; 0 when the record or either instant is missing or unparseable
/// @ai:post symmetric in the two instants (rounding applies to the absolute difference)
/// @ai:effects pure
pub fn resolution_minutes(record: Option<&Record>) -> u64 {
    let Some(record) = record else {
        return 0;
    };

    let (Some(created_raw), Some(resolved_raw)) = (record.created_at_raw(), record.resolved_at_raw())
    else {
        return 0;
    };

    let (Some(created), Some(resolved)) = (record.created_at(), record.resolved_at()) else {
        tracing::debug!(
            "Unparseable timestamp (created: {}, resolved: {}), treating duration as 0",
            created_raw,
            resolved_raw
        );
        return 0;
    };

    let millis = (resolved - created).num_milliseconds().unsigned_abs();
    (millis + MILLIS_PER_MINUTE / 2) / MILLIS_PER_MINUTE
}

/// @ai:intent Rounded mean resolution minutes over a population
/// @ai:post 0 for an empty population
/// @ai:effects pure
pub fn average_minutes<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a Record>,
{
    let (sum, count) = records
        .into_iter()
        .fold((0u64, 0u64), |(s, c), r| (s + resolution_minutes(Some(r)), c + 1));

    if count == 0 {
        0
    } else {
        (sum + count / 2) / count
    }
}

/// @ai:intent Summarise both collections against the fixed SLA policy
/// @ai:effects pure
pub fn compute_summary(issues: &[Record], billing: &[Record]) -> Summary {
    compute_summary_with_targets(issues, billing, SlaTargets::default())
}

/// @ai:intent Summarise both collections against explicit SLA thresholds
/// @ai:effects pure
pub fn compute_summary_with_targets(
    issues: &[Record],
    billing: &[Record],
    targets: SlaTargets,
) -> Summary {
    Summary {
        issues: summarize_domain(issues, targets.issue_minutes),
        billing: summarize_domain(billing, targets.billing_minutes),
    }
}

/// @ai:intent Counts, average and in-target tally for one collection
/// @ai:effects pure
fn summarize_domain(records: &[Record], target_minutes: u64) -> DomainSummary {
    let resolved: Vec<&Record> = records.iter().filter(|r| r.is_resolved()).collect();

    let in_target = resolved
        .iter()
        .filter(|&&r| resolution_minutes(Some(r)) <= target_minutes)
        .count();

    DomainSummary {
        total: records.len(),
        resolved: resolved.len(),
        avg_resolution_minutes: average_minutes(resolved.iter().copied()),
        in_target,
    }
}
