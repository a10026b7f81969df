//! @ai:module:intent Record source and sink: remote sheets store, in-memory store, cache, offline journal
//! @ai:module:layer infrastructure
//! @ai:module:public_api RecordStoreTrait, SheetsClient, InMemoryStore, RecordCache, OfflineJournal, StoreError

pub mod cache;
pub mod client;
pub mod error;
pub mod memory;
pub mod offline;

pub use cache::RecordCache;
pub use client::{RecordStoreTrait, SetupReport, SheetProbe, SheetsClient};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use offline::{OfflineJournal, PendingOp, PendingWrite};
