use crate::core::hashing::hash_block;
use crate::core::Transaction;
use serde::{Deserialize, Serialize};

/// Proof carried by the genesis block
pub const GENESIS_PROOF: u64 = 100;

// Field order mirrors the persisted layout: previous_hash, index, transactions, proof
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Block {
    previous_hash: String,
    index: u64,
    transactions: Vec<Transaction>,
    proof: u64,
}

impl Block {
    pub fn new(
        index: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        proof: u64,
    ) -> Block {
        Block {
            previous_hash,
            index,
            transactions,
            proof,
        }
    }

    /// The fixed first block of every ledger
    pub fn genesis() -> Block {
        Block::new(0, String::new(), vec![], GENESIS_PROOF)
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn digest(&self) -> String {
        hash_block(self)
    }

    /// The trailing reward transaction, if the block ends with one
    pub fn reward(&self) -> Option<&Transaction> {
        self.transactions.last().filter(|tx| tx.is_reward())
    }

    /// Transactions that were hashed into the proof-of-work puzzle.
    ///
    /// A mined block ends with its reward, which is not part of the puzzle.
    /// When the block does not end with a reward every transaction is
    /// returned, so a block with a missing reward can never reproduce the
    /// puzzle input of the block it was derived from.
    pub fn puzzle_transactions(&self) -> &[Transaction] {
        match self.reward() {
            Some(_) => &self.transactions[..self.transactions.len() - 1],
            None => self.transactions.as_slice(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_index_for_test(&mut self, index: u64) {
        self.index = index;
    }

    #[cfg(test)]
    pub(crate) fn set_previous_hash_for_test(&mut self, previous_hash: String) {
        self.previous_hash = previous_hash;
    }

    #[cfg(test)]
    pub(crate) fn set_proof_for_test(&mut self, proof: u64) {
        self.proof = proof;
    }

    #[cfg(test)]
    pub(crate) fn transactions_mut_for_test(&mut self) -> &mut Vec<Transaction> {
        &mut self.transactions
    }
}
