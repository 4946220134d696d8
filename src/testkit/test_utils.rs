//! Test utilities for ledger testing

use crate::core::{Amount, LedgerStore};
use crate::error::{LedgerError, Result};
use std::path::PathBuf;
use tempfile::TempDir;

/// Whole coins as an [`Amount`]
pub fn coins(value: i64) -> Amount {
    Amount::from_coins(value)
}

/// A ledger owned by `owner` with `blocks` reward-only blocks mined on top of genesis
pub fn funded_store(owner: &str, blocks: usize) -> LedgerStore {
    let mut store = LedgerStore::new(owner);
    for _ in 0..blocks {
        store.mine().expect("mining an empty pool should succeed");
        store.clear_pending();
    }
    store
}

/// Create a temporary directory for testing
pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| LedgerError::Io(e.to_string()))
}

/// A path inside a fresh temporary directory; keep the `TempDir` alive while using it
pub fn temp_state_path(file_name: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let path = temp_dir.path().join(file_name);
    Ok((path, temp_dir))
}
