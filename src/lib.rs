//! # Ledger Chain - a single-node proof-of-work ledger
//!
//! An append-only ledger that orders value transfers into hash-linked
//! blocks. Each block is gated by a small proof-of-work puzzle, and anyone
//! holding the ledger can re-run the verifier to confirm nothing was altered
//! and recompute every balance without trusting the node that produced it.
//!
//! ## Layout
//! - `core/`: amounts, transactions, blocks, digests, proof-of-work,
//!   balances, the chain verifier and the [`LedgerStore`]
//! - `storage/`: the pending pool and the persistence adapters (JSON file, sled)
//! - `config/`: node owner, data path and backend selection
//! - `utils/`: hashing and encoding helpers
//! - `cli/`: command-line parsing, the session wrapper and the interactive shell
//!
//! ## Flow
//! 1. `submit_transaction` checks the sender's balance (confirmed receipts
//!    minus confirmed and pending sends) and queues the transfer
//! 2. `mine` solves the puzzle over the pending pool, appends the block with
//!    the owner's reward last, and the caller clears the pool once saved
//! 3. `verify` re-checks every link and proof at any time

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testkit;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt, Session};
pub use config::{Config, StorageBackend, GLOBAL_CONFIG};
pub use crate::core::{
    Amount, Block, CancelToken, LedgerSnapshot, LedgerStore, PendingSnapshot, ProofOfWork,
    Transaction, MINING_REWARD, MINING_SENDER,
};
pub use error::{LedgerError, Result};
pub use storage::{open_store, JsonFileStore, PendingPool, SledStore, StateStore};
