//! Block digests
//!
//! A block is reduced to a canonical byte string before hashing: every field
//! in a fixed order, integers big-endian, strings length-prefixed. Two
//! structurally identical blocks always produce the same bytes and any field
//! change produces different bytes.

use crate::core::transaction::append_str;
use crate::core::{Block, Transaction};
use crate::utils::sha256_hex;

/// Canonical bytes of an ordered transaction list: count, then each transaction
pub fn transactions_bytes(transactions: &[Transaction]) -> Vec<u8> {
    let mut data_bytes = vec![];
    data_bytes.extend((transactions.len() as u64).to_be_bytes());
    for transaction in transactions {
        data_bytes.extend(transaction.canonical_bytes());
    }
    data_bytes
}

/// Canonical bytes of a whole block: index, previous hash, transactions, proof
pub fn block_bytes(block: &Block) -> Vec<u8> {
    let mut data_bytes = vec![];
    data_bytes.extend(block.get_index().to_be_bytes());
    append_str(&mut data_bytes, block.get_previous_hash());
    data_bytes.extend(transactions_bytes(block.get_transactions()));
    data_bytes.extend(block.get_proof().to_be_bytes());
    data_bytes
}

/// SHA-256 digest of the block's canonical bytes, as 64 lowercase hex chars
pub fn hash_block(block: &Block) -> String {
    sha256_hex(&block_bytes(block))
}
