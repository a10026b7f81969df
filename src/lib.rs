//! @ai:module:intent Operations dashboard library: issue and billing-correction metrics over a spreadsheet store
//! @ai:module:layer application
//! @ai:module:public_api config, metrics, records, report, service, store

pub mod config;
pub mod metrics;
pub mod records;
pub mod report;
pub mod service;
pub mod store;

pub use config::DashboardConfig;
pub use metrics::{
    average_minutes, compute_summary, resolution_minutes, DashboardAggregator, DashboardReport,
    MonthWindow, SlaTargets, Summary,
};
pub use records::{NewBillingCorrection, NewIssue, Record, RecordKind};
pub use report::ReportGenerator;
pub use service::{Dashboard, ReconcileReport, WriteOutcome};
pub use store::{InMemoryStore, OfflineJournal, RecordCache, RecordStoreTrait, SheetsClient, StoreError};
