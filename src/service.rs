//! @ai:module:intent Dashboard operations: load, summarise, create, resolve, reconcile
//! @ai:module:layer application
//! @ai:module:public_api Dashboard, WriteOutcome, ReconcileReport
//! @ai:module:stateless false

use crate::metrics::{
    compute_summary_with_targets, DashboardAggregator, DashboardAggregatorTrait, DashboardReport,
    MonthWindow, SlaTargets, Snapshot, Summary,
};
use crate::records::{NewBillingCorrection, NewIssue, Record, RecordKind, STATUS_RESOLVED};
use crate::store::error::{Result, StoreError};
use crate::store::{OfflineJournal, PendingOp, PendingWrite, RecordCache, RecordStoreTrait, SetupReport};
use serde::Serialize;
use std::sync::Arc;

/// @ai:intent What happened to a create or resolve request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum WriteOutcome {
    /// Applied to the remote store
    Synced,
    /// Store unreachable; written to the offline journal
    Queued { pending: usize },
    /// Nothing to do (record already resolved)
    Unchanged,
}

/// @ai:intent Result of replaying the offline journal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub applied: usize,
    pub remaining: usize,
    pub last_error: Option<String>,
}

/// @ai:intent Dashboard bound to one record store
pub struct Dashboard<S: RecordStoreTrait> {
    store: Arc<S>,
    journal: Option<OfflineJournal>,
    targets: SlaTargets,
}

impl<S: RecordStoreTrait> Dashboard<S> {
    /// @ai:intent Create a dashboard over a store with default SLA targets and no journal
    /// @ai:effects pure
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            journal: None,
            targets: SlaTargets::default(),
        }
    }

    /// @ai:intent Queue failed writes in this journal instead of failing them
    pub fn with_journal(mut self, journal: OfflineJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn with_targets(mut self, targets: SlaTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn targets(&self) -> SlaTargets {
        self.targets
    }

    /// @ai:intent Fetch a collection, serving from the cache when given a fresh entry
    /// @ai:post fetch failures are logged and yield an empty collection
    /// @ai:effects network
    pub async fn records(&self, kind: RecordKind, cache: Option<&mut RecordCache>) -> Vec<Record> {
        if let Some(hit) = cache.as_deref().and_then(|c| c.get(kind)) {
            tracing::debug!("Serving {} {} records from cache", hit.len(), kind);
            return hit.to_vec();
        }

        match self.store.fetch(kind).await {
            Ok(records) => {
                if let Some(cache) = cache {
                    cache.insert(kind, records.clone());
                }
                records
            }
            Err(e) => {
                tracing::error!("Error fetching {} from store: {}", kind.sheet_name(), e);
                Vec::new()
            }
        }
    }

    /// @ai:intent Fetch both collections plus the offline backlog size
    /// @ai:effects network, fs:read
    pub async fn snapshot(&self, cache: Option<&mut RecordCache>) -> Snapshot {
        let mut cache = cache;
        let issues = self.records(RecordKind::Issues, cache.as_deref_mut()).await;
        let billing = self.records(RecordKind::Billing, cache.as_deref_mut()).await;

        Snapshot {
            issues,
            billing,
            pending_writes: self.pending_count(),
        }
    }

    /// @ai:intent Recompute the eight dashboard numbers from a fresh snapshot
    /// @ai:effects network
    pub async fn summary(&self, cache: Option<&mut RecordCache>) -> Summary {
        let snapshot = self.snapshot(cache).await;
        compute_summary_with_targets(&snapshot.issues, &snapshot.billing, self.targets)
    }

    /// @ai:intent Summary plus monthly series for the given window
    /// @ai:effects network, time
    pub async fn report(&self, window: &MonthWindow, cache: Option<&mut RecordCache>) -> DashboardReport {
        let snapshot = self.snapshot(cache).await;
        DashboardAggregator::new().build(&snapshot, window, self.targets)
    }

    /// @ai:intent Record a new application issue
    /// @ai:effects network, fs:write
    pub async fn create_issue(
        &self,
        issue: NewIssue,
        cache: Option<&mut RecordCache>,
    ) -> Result<WriteOutcome> {
        let record = issue.into_record(chrono::Utc::now());
        self.apply(RecordKind::Issues, PendingOp::Append { record }, cache)
            .await
    }

    /// @ai:intent Record a new billing correction
    /// @ai:effects network, fs:write
    pub async fn create_billing(
        &self,
        correction: NewBillingCorrection,
        cache: Option<&mut RecordCache>,
    ) -> Result<WriteOutcome> {
        let record = correction.into_record(chrono::Utc::now());
        self.apply(RecordKind::Billing, PendingOp::Append { record }, cache)
            .await
    }

    /// @ai:intent Mark the record at a position as resolved, stamping the resolution time
    /// @ai:pre index refers to a record in the latest fetch of the collection
    /// @ai:effects network, fs:write, time
    pub async fn resolve(
        &self,
        kind: RecordKind,
        index: usize,
        cache: Option<&mut RecordCache>,
    ) -> Result<WriteOutcome> {
        let mut cache = cache;

        if let Some(c) = cache.as_deref_mut() {
            c.invalidate(kind);
        }

        let records = self.store.fetch(kind).await?;
        let len = records.len();

        let mut record = records
            .into_iter()
            .nth(index)
            .ok_or(StoreError::IndexOutOfRange {
                sheet: kind.sheet_name(),
                index,
                len,
            })?;

        if record.is_resolved() {
            tracing::info!("{} record {} is already resolved", kind, index);
            return Ok(WriteOutcome::Unchanged);
        }

        if record.is_resolved_ignoring_case() && record.resolved_at_raw().is_some() {
            // Resolved under another casing: fix the status, keep the original resolution time
            tracing::info!("Normalising status of {} record {} to {}", kind, index, STATUS_RESOLVED);
            record.set("status", STATUS_RESOLVED);
        } else {
            record.mark_resolved(chrono::Utc::now());
        }

        self.apply(kind, PendingOp::Update { index, record }, cache)
            .await
    }

    /// @ai:intent Replay queued writes in order, stopping at the first failure
    /// @ai:post applied writes are removed from the journal, the rest are kept
    /// @ai:effects network, fs:read, fs:write
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let Some(journal) = &self.journal else {
            return Ok(ReconcileReport::default());
        };

        let writes = journal.load()?;
        let mut report = ReconcileReport::default();

        for write in &writes {
            match self.send(write.kind, &write.op).await {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    tracing::warn!(
                        "Reconciliation stopped at {} write queued {}: {}",
                        write.kind,
                        write.queued_at,
                        e
                    );
                    report.last_error = Some(e.to_string());
                    break;
                }
            }
        }

        let remaining = &writes[report.applied..];
        journal.save(remaining)?;
        report.remaining = remaining.len();

        tracing::info!(
            "Reconciled {} queued writes, {} remaining",
            report.applied,
            report.remaining
        );
        Ok(report)
    }

    /// @ai:intent Probe the store's sheets
    /// @ai:effects network
    pub async fn check_setup(&self) -> SetupReport {
        self.store.check_setup().await
    }

    /// @ai:intent Number of writes waiting in the offline journal
    /// @ai:effects fs:read
    pub fn pending_count(&self) -> usize {
        let Some(journal) = &self.journal else {
            return 0;
        };

        journal.pending_count().unwrap_or_else(|e| {
            tracing::warn!("Cannot read offline journal {}: {}", journal.path().display(), e);
            0
        })
    }

    /// @ai:intent Send a write, queueing it when the store is down and a journal is configured
    /// @ai:effects network, fs:write
    async fn apply(
        &self,
        kind: RecordKind,
        op: PendingOp,
        cache: Option<&mut RecordCache>,
    ) -> Result<WriteOutcome> {
        if let Some(cache) = cache {
            cache.invalidate(kind);
        }

        let error = match self.send(kind, &op).await {
            Ok(()) => return Ok(WriteOutcome::Synced),
            Err(e) => e,
        };

        match &self.journal {
            Some(journal) if error.is_transient() => {
                let pending = journal.push(PendingWrite::new(kind, op))?;

                tracing::warn!(
                    "Store unreachable ({}); write to {} queued in {}, {} pending until sync",
                    error,
                    kind.sheet_name(),
                    journal.path().display(),
                    pending
                );
                Ok(WriteOutcome::Queued { pending })
            }
            _ => Err(error),
        }
    }

    async fn send(&self, kind: RecordKind, op: &PendingOp) -> Result<()> {
        match op {
            PendingOp::Append { record } => self.store.append(kind, record).await,
            PendingOp::Update { index, record } => self.store.update(kind, *index, record).await,
        }
    }
}
