//! @ai:module:intent Caller-owned cache of fetched collections with explicit invalidation
//! @ai:module:layer infrastructure
//! @ai:module:public_api RecordCache
//! @ai:module:stateless false

use crate::records::{Record, RecordKind};
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct CachedSheet {
    records: Vec<Record>,
    fetched_at: Instant,
}

/// @ai:intent Per-kind cache of full collections, passed explicitly into fetches
/// @ai:invariant an entry older than max_age is never returned
pub struct RecordCache {
    entries: HashMap<RecordKind, CachedSheet>,
    max_age: Option<Duration>,
}

impl RecordCache {
    /// @ai:intent Create a cache; None keeps entries until invalidated
    /// @ai:effects pure
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            max_age,
        }
    }

    /// @ai:intent Cached collection if present and fresh
    /// @ai:effects time
    pub fn get(&self, kind: RecordKind) -> Option<&[Record]> {
        let entry = self.entries.get(&kind)?;

        match self.max_age {
            Some(max_age) if entry.fetched_at.elapsed() >= max_age => None,
            _ => Some(&entry.records),
        }
    }

    pub fn insert(&mut self, kind: RecordKind, records: Vec<Record>) {
        self.entries.insert(
            kind,
            CachedSheet {
                records,
                fetched_at: Instant::now(),
            },
        );
    }

    /// @ai:intent Drop the cached collection for one kind
    /// @ai:effects state:write
    pub fn invalidate(&mut self, kind: RecordKind) {
        if self.entries.remove(&kind).is_some() {
            tracing::debug!("Invalidated cached {} records", kind);
        }
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new(None)
    }
}
