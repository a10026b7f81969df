//! @ai:module:intent Dashboard metrics: resolution times, SLA attainment, monthly volumes
//! @ai:module:layer application
//! @ai:module:public_api Summary, DomainSummary, SlaTargets, MonthWindow, MonthlySeries, DashboardReport, DashboardAggregator

pub mod aggregator;
pub mod engine;
pub mod types;

pub use aggregator::{
    monthly_counts, DashboardAggregator, DashboardAggregatorTrait, MonthWindow, MAX_WINDOW_MONTHS,
};
pub use engine::{
    average_minutes, compute_summary, compute_summary_with_targets, resolution_minutes,
    BILLING_TARGET_MINUTES, ISSUE_TARGET_MINUTES,
};
pub use types::{DashboardReport, DomainSummary, MonthlySeries, SlaTargets, Snapshot, Summary};
