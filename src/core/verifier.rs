//! Chain verification
//!
//! Read-only audit of a whole ledger. The audit stops at the first broken
//! block and reports it; nothing is repaired.

use crate::core::balance::{confirmed_received, confirmed_sent};
use crate::core::{Amount, Block, ProofOfWork, MINING_REWARD};
use crate::error::{LedgerError, Result};
use crate::storage::PendingPool;
use log::warn;
use std::collections::HashMap;

fn violation(index: usize, reason: impl Into<String>) -> LedgerError {
    LedgerError::ChainIntegrityViolation {
        index,
        reason: reason.into(),
    }
}

/// Check one non-genesis block against its predecessor
pub fn check_block(index: usize, block: &Block, previous: &Block) -> Result<()> {
    if block.get_index() != index as u64 {
        return Err(violation(
            index,
            format!("block carries index {}", block.get_index()),
        ));
    }

    if block.get_previous_hash() != previous.digest() {
        return Err(violation(index, "previous hash does not match prior block"));
    }

    let reward = block
        .reward()
        .ok_or_else(|| violation(index, "block does not end with a reward transaction"))?;
    if reward.get_amount() != MINING_REWARD {
        return Err(violation(
            index,
            format!("reward of {} instead of {MINING_REWARD}", reward.get_amount()),
        ));
    }

    if reward.get_recipient().is_empty() {
        return Err(violation(index, "reward has no recipient"));
    }

    let puzzle_transactions = block.puzzle_transactions();
    for tx in puzzle_transactions {
        if tx.is_reward() {
            return Err(violation(index, "reward transaction before the end of block"));
        }
        if let Err(e) = tx.validate() {
            return Err(violation(index, e.to_string()));
        }
    }

    if !ProofOfWork::validate(
        puzzle_transactions,
        block.get_previous_hash(),
        block.get_proof(),
    ) {
        return Err(violation(index, "proof of work is invalid"));
    }

    Ok(())
}

/// Full audit, returning the first violation found
pub fn check_chain(chain: &[Block]) -> Result<()> {
    let genesis = chain
        .first()
        .ok_or_else(|| violation(0, "ledger has no genesis block"))?;
    if *genesis != Block::genesis() {
        return Err(violation(0, "genesis block has been altered"));
    }

    for (index, pair) in chain.windows(2).enumerate() {
        check_block(index + 1, &pair[1], &pair[0])?;
    }
    Ok(())
}

/// Boolean view of [`check_chain`]
pub fn verify(chain: &[Block]) -> bool {
    match check_chain(chain) {
        Ok(()) => true,
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}

/// Re-check every pending transaction against the confirmed chain.
///
/// The pool is replayed in arrival order: each transaction must be covered by
/// the sender's confirmed balance minus whatever the same sender already
/// committed earlier in the pool, which is the same test it passed on entry.
pub fn verify_all_pending(pending: &PendingPool, chain: &[Block]) -> bool {
    let mut committed: HashMap<&str, Amount> = HashMap::new();
    for tx in pending {
        let sender = tx.get_sender();
        let already = committed.get(sender).copied().unwrap_or(Amount::ZERO);
        let affordable = tx.is_affordable(|who| {
            confirmed_received(who, chain) - confirmed_sent(who, chain) - already
        });
        if !affordable {
            warn!(
                "Pending transaction {} -> {} of {} is no longer covered",
                sender,
                tx.get_recipient(),
                tx.get_amount()
            );
            return false;
        }
        committed.insert(sender, already + tx.get_amount());
    }
    true
}
