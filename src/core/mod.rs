//! Core ledger functionality
//!
//! This module contains the ledger data model (amounts, transactions,
//! blocks), the block digest, the proof-of-work puzzle, balance accounting,
//! chain verification and the ledger store that ties them together.

pub mod amount;
pub mod balance;
pub mod block;
pub mod hashing;
pub mod ledger;
pub mod proof_of_work;
pub mod transaction;
pub mod verifier;

pub use amount::{Amount, MINING_REWARD, UNITS_PER_COIN};
pub use block::{Block, GENESIS_PROOF};
pub use hashing::hash_block;
pub use ledger::{LedgerSnapshot, LedgerStore, PendingSnapshot};
pub use proof_of_work::{CancelToken, ProofOfWork, DIFFICULTY_PREFIX};
pub use transaction::{Transaction, MINING_SENDER};
