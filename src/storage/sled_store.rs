// Embedded-database backend: both records live in one sled tree and are
// replaced inside a single sled transaction.

use crate::core::{LedgerSnapshot, PendingSnapshot};
use crate::error::{LedgerError, Result};
use crate::storage::StateStore;
use crate::utils::{deserialize, serialize};
use log::{debug, info};
use sled::transaction::TransactionError;
use sled::Db;
use std::path::{Path, PathBuf};

const STATE_TREE: &str = "state";
const CHAIN_KEY: &str = "chain";
const PENDING_KEY: &str = "pending";

pub struct SledStore {
    db: Db,
    db_path: PathBuf,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<SledStore> {
        let db = sled::open(path).map_err(|e| {
            LedgerError::PersistenceFailure(format!("Failed to open database: {e}"))
        })?;
        Ok(SledStore {
            db,
            db_path: path.to_path_buf(),
        })
    }

    fn state_tree(&self) -> Result<sled::Tree> {
        self.db.open_tree(STATE_TREE).map_err(|e| {
            LedgerError::PersistenceFailure(format!("Failed to open state tree: {e}"))
        })
    }
}

impl StateStore for SledStore {
    fn load(&self) -> Result<Option<(LedgerSnapshot, PendingSnapshot)>> {
        let tree = self.state_tree()?;
        let chain_bytes = tree.get(CHAIN_KEY)?;
        let pending_bytes = tree.get(PENDING_KEY)?;

        let (chain_bytes, pending_bytes) = match (chain_bytes, pending_bytes) {
            (Some(chain), Some(pending)) => (chain, pending),
            (None, None) => {
                debug!("No state in {}", self.db_path.display());
                return Ok(None);
            }
            _ => {
                return Err(LedgerError::PersistenceFailure(
                    "database holds only one of the two state records".to_string(),
                ))
            }
        };

        let ledger: LedgerSnapshot = deserialize(chain_bytes.as_ref())
            .map_err(|e| LedgerError::PersistenceFailure(format!("chain record: {e}")))?;
        let pending: PendingSnapshot = deserialize(pending_bytes.as_ref())
            .map_err(|e| LedgerError::PersistenceFailure(format!("pending record: {e}")))?;
        info!(
            "Loaded {} blocks and {} pending transactions from {}",
            ledger.blocks.len(),
            pending.transactions.len(),
            self.db_path.display()
        );
        Ok(Some((ledger, pending)))
    }

    fn save(&self, ledger: &LedgerSnapshot, pending: &PendingSnapshot) -> Result<()> {
        let chain_bytes = serialize(ledger)?;
        let pending_bytes = serialize(pending)?;
        let tree = self.state_tree()?;

        tree.transaction(|tx_db| {
            tx_db.insert(CHAIN_KEY, chain_bytes.as_slice())?;
            tx_db.insert(PENDING_KEY, pending_bytes.as_slice())?;
            Ok(())
        })
        .map_err(|e: TransactionError| {
            LedgerError::PersistenceFailure(format!("Failed to write state: {e}"))
        })?;
        tree.flush()?;
        debug!("Saved state to {}", self.db_path.display());
        Ok(())
    }
}
