use crate::core::hashing::transactions_bytes;
use crate::core::Transaction;
use crate::error::{LedgerError, Result};
use crate::utils::sha256_hex;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A solved puzzle digest starts with this prefix. Difficulty is fixed.
pub const DIFFICULTY_PREFIX: &str = "00";

// How often the search loop looks at its cancellation token
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Shared flag that stops a running proof search.
///
/// Clones share the same flag, so a token handed to another thread can stop
/// a search running here.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct ProofOfWork<'a> {
    transactions: &'a [Transaction],
    previous_hash: &'a str,
    max_proof: u64,
}

impl<'a> ProofOfWork<'a> {
    pub fn new(transactions: &'a [Transaction], previous_hash: &'a str) -> ProofOfWork<'a> {
        ProofOfWork {
            transactions,
            previous_hash,
            max_proof: u64::MAX,
        }
    }

    /// Give up once every candidate up to and including `max_proof` failed
    pub fn with_max_proof(mut self, max_proof: u64) -> ProofOfWork<'a> {
        self.max_proof = max_proof;
        self
    }

    /// Check a candidate proof against the puzzle predicate
    pub fn validate(transactions: &[Transaction], previous_hash: &str, proof: u64) -> bool {
        ProofOfWork::new(transactions, previous_hash).is_valid(proof)
    }

    fn prepare_data(&self, proof: u64) -> Vec<u8> {
        let mut data_bytes = transactions_bytes(self.transactions);
        data_bytes.extend(self.previous_hash.as_bytes());
        data_bytes.extend(proof.to_string().as_bytes());
        data_bytes
    }

    fn is_valid(&self, proof: u64) -> bool {
        sha256_hex(&self.prepare_data(proof)).starts_with(DIFFICULTY_PREFIX)
    }

    /// Linear search from 0 upward; the first valid candidate wins
    pub fn run(&self, cancel: &CancelToken) -> Result<u64> {
        debug!(
            "Searching proof over {} transactions on top of {}",
            self.transactions.len(),
            self.previous_hash
        );
        let mut proof: u64 = 0;
        loop {
            if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                info!("Proof search cancelled at candidate {proof}");
                return Err(LedgerError::MiningCancelled);
            }
            if self.is_valid(proof) {
                debug!("Found proof {proof}");
                return Ok(proof);
            }
            if proof >= self.max_proof {
                return Err(LedgerError::Mining(format!(
                    "no valid proof in 0..={}",
                    self.max_proof
                )));
            }
            proof += 1;
        }
    }
}
