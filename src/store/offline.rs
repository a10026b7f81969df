//! @ai:module:intent Local journal of writes the remote store did not accept, awaiting reconciliation
//! @ai:module:layer infrastructure
//! @ai:module:public_api OfflineJournal, PendingWrite, PendingOp
//! @ai:module:stateless false

use crate::records::{Record, RecordKind};
use crate::store::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// @ai:intent The write that was attempted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PendingOp {
    Append { record: Record },
    Update { index: usize, record: Record },
}

/// @ai:intent One queued write and when it was queued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub kind: RecordKind,
    #[serde(flatten)]
    pub op: PendingOp,
    pub queued_at: String,
}

impl PendingWrite {
    /// @ai:intent Stamp a write with the current time
    /// @ai:effects time
    pub fn new(kind: RecordKind, op: PendingOp) -> Self {
        Self {
            kind,
            op,
            queued_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn append(kind: RecordKind, record: Record) -> Self {
        Self::new(kind, PendingOp::Append { record })
    }

    pub fn update(kind: RecordKind, index: usize, record: Record) -> Self {
        Self::new(kind, PendingOp::Update { index, record })
    }
}

/// @ai:intent JSON file holding pending writes in the order they were attempted
pub struct OfflineJournal {
    path: PathBuf,
}

impl OfflineJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// @ai:intent Read all pending writes; a missing journal is empty
    /// @ai:effects fs:read
    pub fn load(&self) -> Result<Vec<PendingWrite>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// @ai:intent Replace the journal contents atomically
    /// @ai:effects fs:write
    pub fn save(&self, writes: &[PendingWrite]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(writes)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// @ai:intent Queue a write and return the number now pending
    /// @ai:effects fs:read, fs:write
    pub fn push(&self, write: PendingWrite) -> Result<usize> {
        let mut writes = self.load()?;
        writes.push(write);
        self.save(&writes)?;
        Ok(writes.len())
    }

    pub fn pending_count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_journal_is_empty() {
        let temp = TempDir::new().unwrap();
        let journal = OfflineJournal::new(temp.path().join("pending.json"));
        assert!(journal.load().unwrap().is_empty());
        assert_eq!(journal.pending_count().unwrap(), 0);
    }

    #[test]
    fn test_push_preserves_order() {
        let temp = TempDir::new().unwrap();
        let journal = OfflineJournal::new(temp.path().join("nested").join("pending.json"));

        let first = PendingWrite::append(RecordKind::Issues, Record::new().with("title", "a"));
        let second = PendingWrite::update(RecordKind::Billing, 4, Record::new().with("status", "Resolved"));

        assert_eq!(journal.push(first.clone()).unwrap(), 1);
        assert_eq!(journal.push(second.clone()).unwrap(), 2);

        assert_eq!(journal.load().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_journal_format() {
        let temp = TempDir::new().unwrap();
        let journal = OfflineJournal::new(temp.path().join("pending.json"));
        journal
            .push(PendingWrite::update(RecordKind::Issues, 2, Record::new()))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(journal.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["kind"], "issues");
        assert_eq!(raw[0]["op"], "update");
        assert_eq!(raw[0]["index"], 2);
    }
}
