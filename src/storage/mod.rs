//! Data storage and persistence
//!
//! This module holds the in-memory pending pool and the adapters that turn
//! ledger state into durable bytes. The ledger core never touches the disk;
//! it hands [`LedgerSnapshot`] and [`PendingSnapshot`] records to a
//! [`StateStore`] and gets them back on load.

pub mod json_file;
pub mod memory_pool;
pub mod sled_store;

pub use json_file::JsonFileStore;
pub use memory_pool::PendingPool;
pub use sled_store::SledStore;

use crate::config::StorageBackend;
use crate::core::{LedgerSnapshot, PendingSnapshot};
use crate::error::Result;
use std::path::Path;

/// Durable home for the two ledger records
pub trait StateStore {
    /// Load both records, or `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<(LedgerSnapshot, PendingSnapshot)>>;

    /// Replace both records together
    fn save(&self, ledger: &LedgerSnapshot, pending: &PendingSnapshot) -> Result<()>;
}

/// Open the store selected by `backend` at `path`
pub fn open_store(backend: StorageBackend, path: &Path) -> Result<Box<dyn StateStore>> {
    match backend {
        StorageBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StorageBackend::Sled => Ok(Box::new(SledStore::open(path)?)),
    }
}
