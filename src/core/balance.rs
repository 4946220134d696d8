//! Balance accounting
//!
//! A balance is derived, never stored: confirmed receipts minus confirmed
//! sends minus unconfirmed sends. Unconfirmed receipts are not counted, so
//! funds cannot be spent before they are mined, while funds already promised
//! to a pending transaction cannot be promised twice.

use crate::core::{Amount, Block};
use crate::storage::PendingPool;

/// Total received by `participant` across confirmed blocks
pub fn confirmed_received(participant: &str, chain: &[Block]) -> Amount {
    chain
        .iter()
        .flat_map(|block| block.get_transactions())
        .filter(|tx| tx.get_recipient() == participant)
        .map(|tx| tx.get_amount())
        .sum()
}

/// Total sent by `participant` across confirmed blocks
pub fn confirmed_sent(participant: &str, chain: &[Block]) -> Amount {
    chain
        .iter()
        .flat_map(|block| block.get_transactions())
        .filter(|tx| tx.get_sender() == participant)
        .map(|tx| tx.get_amount())
        .sum()
}

/// Spendable balance of `participant`
pub fn balance(participant: &str, chain: &[Block], pending: &PendingPool) -> Amount {
    confirmed_received(participant, chain)
        - confirmed_sent(participant, chain)
        - pending.sent_by(participant)
}
