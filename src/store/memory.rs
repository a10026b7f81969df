//! @ai:module:intent In-process record store for dry runs and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api InMemoryStore
//! @ai:module:stateless false

use crate::records::{Record, RecordKind};
use crate::store::client::RecordStoreTrait;
use crate::store::error::{Result, StoreError};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// @ai:intent Fixture file layout: both collections under their kind names
#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    issues: Vec<Record>,
    #[serde(default)]
    billing: Vec<Record>,
}

#[derive(Debug, Default)]
struct Sheets {
    issues: Vec<Record>,
    billing: Vec<Record>,
}

impl Sheets {
    fn get_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Issues => &mut self.issues,
            RecordKind::Billing => &mut self.billing,
        }
    }
}

/// @ai:intent Record store held in memory, with a switch to simulate an outage
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sheets: Mutex<Sheets>,
    unavailable: AtomicBool,
    writes_unavailable: AtomicBool,
}

impl InMemoryStore {
    /// @ai:intent Create an empty store
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Create a store pre-populated with both collections
    /// @ai:effects pure
    pub fn with_records(issues: Vec<Record>, billing: Vec<Record>) -> Self {
        Self {
            sheets: Mutex::new(Sheets { issues, billing }),
            unavailable: AtomicBool::new(false),
            writes_unavailable: AtomicBool::new(false),
        }
    }

    /// @ai:intent Load a store from a JSON fixture {"issues": [...], "billing": [...]}
    /// @ai:effects fs:read
    pub fn from_fixture(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&content)?;

        tracing::info!(
            "Loaded fixture {} ({} issues, {} billing)",
            path.display(),
            fixture.issues.len(),
            fixture.billing.len()
        );

        Ok(Self::with_records(fixture.issues, fixture.billing))
    }

    /// @ai:intent Toggle simulated outage; every call fails while set
    /// @ai:effects state:write
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// @ai:intent Toggle a write-only outage; fetches keep working while set
    /// @ai:effects state:write
    pub fn set_writes_unavailable(&self, unavailable: bool) {
        self.writes_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// @ai:intent Copy of the current contents of a collection
    /// @ai:effects state:read
    pub async fn records(&self, kind: RecordKind) -> Vec<Record> {
        self.sheets.lock().await.get_mut(kind).clone()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked offline".to_string()));
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        self.ensure_available()?;
        if self.writes_unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store rejecting writes".to_string()));
        }
        Ok(())
    }
}

impl RecordStoreTrait for InMemoryStore {
    async fn fetch(&self, kind: RecordKind) -> Result<Vec<Record>> {
        self.ensure_available()?;
        Ok(self.records(kind).await)
    }

    async fn append(&self, kind: RecordKind, record: &Record) -> Result<()> {
        self.ensure_writable()?;
        self.sheets.lock().await.get_mut(kind).push(record.clone());
        Ok(())
    }

    async fn update(&self, kind: RecordKind, index: usize, record: &Record) -> Result<()> {
        self.ensure_writable()?;

        let mut sheets = self.sheets.lock().await;
        let rows = sheets.get_mut(kind);
        let len = rows.len();

        let slot = rows.get_mut(index).ok_or(StoreError::IndexOutOfRange {
            sheet: kind.sheet_name(),
            index,
            len,
        })?;
        *slot = record.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_then_fetch() {
        let store = InMemoryStore::new();
        store
            .append(RecordKind::Issues, &Record::new().with("title", "a"))
            .await
            .unwrap();

        let issues = store.fetch(RecordKind::Issues).await.unwrap();
        assert_eq!(issues.len(), 1);
        assert!(store.fetch(RecordKind::Billing).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_out_of_range() {
        let store = InMemoryStore::new();
        let err = store
            .update(RecordKind::Billing, 0, &Record::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 0, len: 0, .. }));
    }

    #[tokio::test]
    async fn test_unavailable_fails_all_calls() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        assert!(store.fetch(RecordKind::Issues).await.is_err());
        assert!(store.append(RecordKind::Issues, &Record::new()).await.is_err());

        store.set_unavailable(false);
        assert!(store.fetch(RecordKind::Issues).await.is_ok());
    }

    #[tokio::test]
    async fn test_write_outage_keeps_reads() {
        let store = InMemoryStore::with_records(vec![Record::new()], vec![]);
        store.set_writes_unavailable(true);

        assert_eq!(store.fetch(RecordKind::Issues).await.unwrap().len(), 1);
        let err = store
            .update(RecordKind::Issues, 0, &Record::new().with("status", "Resolved"))
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(store.append(RecordKind::Issues, &Record::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_from_fixture() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fixture.json");
        std::fs::write(
            &path,
            r#"{"issues": [{"status": "Open"}], "billing": [{"type": "Refund"}, {"type": "Discount"}]}"#,
        )
        .unwrap();

        let store = InMemoryStore::from_fixture(&path).unwrap();
        assert_eq!(store.records(RecordKind::Issues).await.len(), 1);
        assert_eq!(store.records(RecordKind::Billing).await.len(), 2);
    }
}
