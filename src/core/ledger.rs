// The ledger store owns the whole mutable state of a node: the chain of blocks,
// the pending pool and the participant set. Balance checks read all three, so
// they live behind one value and every mutation goes through &mut self.

use crate::core::balance::balance;
use crate::core::verifier::{check_chain, verify, verify_all_pending};
use crate::core::{Amount, Block, CancelToken, ProofOfWork, Transaction};
use crate::error::{LedgerError, Result};
use crate::storage::PendingPool;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Record 1 of the durable state: every block in order
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    pub blocks: Vec<Block>,
}

/// Record 2 of the durable state: the pending pool in arrival order
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
#[serde(transparent)]
pub struct PendingSnapshot {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct LedgerStore {
    owner: String,
    chain: Vec<Block>,
    pending: PendingPool,
    participants: BTreeSet<String>,
}

impl LedgerStore {
    /// A fresh ledger holding only the genesis block, owned by `owner`
    pub fn new(owner: &str) -> LedgerStore {
        let mut participants = BTreeSet::new();
        participants.insert(owner.to_string());
        LedgerStore {
            owner: owner.to_string(),
            chain: vec![Block::genesis()],
            pending: PendingPool::new(),
            participants,
        }
    }

    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    pub fn blocks(&self) -> &[Block] {
        self.chain.as_slice()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn last_block(&self) -> &Block {
        // The chain always holds at least the genesis block
        &self.chain[self.chain.len() - 1]
    }

    pub fn pending(&self) -> &PendingPool {
        &self.pending
    }

    pub fn list_participants(&self) -> Vec<String> {
        self.participants.iter().cloned().collect()
    }

    /// Spendable balance: confirmed receipts minus confirmed and pending sends
    pub fn balance(&self, participant: &str) -> Amount {
        balance(participant, &self.chain, &self.pending)
    }

    /// Queue a transfer once the sender can cover it
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Amount,
    ) -> Result<()> {
        let transaction = Transaction::new(sender, recipient, amount)?;

        let available = self.balance(sender);
        if !transaction.is_affordable(|_| available) {
            warn!("Rejected {sender} -> {recipient} of {amount}: balance {available}");
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        self.pending.push(transaction);
        self.participants.insert(sender.to_string());
        self.participants.insert(recipient.to_string());
        info!("Accepted {sender} -> {recipient} of {amount}");
        Ok(())
    }

    pub fn mine(&mut self) -> Result<Block> {
        self.mine_with_cancel(&CancelToken::new())
    }

    /// Solve the puzzle over the pending pool and append the new block.
    ///
    /// The pool is copied into the block, not drained: the caller clears it
    /// with [`LedgerStore::clear_pending`] once the block is durable. If the
    /// search is cancelled nothing changes.
    pub fn mine_with_cancel(&mut self, cancel: &CancelToken) -> Result<Block> {
        let previous_hash = self.last_block().digest();
        let proof = ProofOfWork::new(self.pending.as_slice(), &previous_hash).run(cancel)?;

        let mut transactions = self.pending.to_vec();
        transactions.push(Transaction::reward(&self.owner));

        let block = Block::new(self.chain.len() as u64, previous_hash, transactions, proof);
        self.chain.push(block.clone());
        info!(
            "Mined block {} with {} transactions (proof {proof})",
            block.get_index(),
            block.get_transactions().len()
        );
        Ok(block)
    }

    /// Empty the pending pool after its transactions were mined
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn check_integrity(&self) -> Result<()> {
        check_chain(&self.chain)
    }

    pub fn verify(&self) -> bool {
        verify(&self.chain)
    }

    pub fn verify_all_pending(&self) -> bool {
        verify_all_pending(&self.pending, &self.chain)
    }

    pub fn export_state(&self) -> (LedgerSnapshot, PendingSnapshot) {
        (
            LedgerSnapshot {
                blocks: self.chain.clone(),
            },
            PendingSnapshot {
                transactions: self.pending.to_vec(),
            },
        )
    }

    /// Replace the in-memory state with a loaded snapshot.
    ///
    /// The snapshot must pass the chain audit and every pending transaction must
    /// be a valid transfer; otherwise the current state is kept and the error returned.
    pub fn import_state(&mut self, ledger: LedgerSnapshot, pending: PendingSnapshot) -> Result<()> {
        check_chain(&ledger.blocks)?;
        for tx in &pending.transactions {
            tx.validate()?;
        }

        let mut participants = BTreeSet::new();
        participants.insert(self.owner.clone());
        let all_transactions = ledger
            .blocks
            .iter()
            .flat_map(|block| block.get_transactions())
            .chain(pending.transactions.iter());
        for tx in all_transactions {
            if !tx.is_reward() {
                participants.insert(tx.get_sender().to_string());
            }
            participants.insert(tx.get_recipient().to_string());
        }

        info!(
            "Imported {} blocks and {} pending transactions",
            ledger.blocks.len(),
            pending.transactions.len()
        );
        self.chain = ledger.blocks;
        self.pending = PendingPool::from_transactions(pending.transactions);
        self.participants = participants;
        Ok(())
    }

    /// Overwrite a block in memory without any checks. Debug builds only; the
    /// next audit reports the damage.
    #[cfg(debug_assertions)]
    pub fn replace_block(&mut self, index: usize, block: Block) -> Result<()> {
        let len = self.chain.len();
        let slot = self.chain.get_mut(index).ok_or_else(|| LedgerError::ChainIntegrityViolation {
            index,
            reason: format!("no such block in a chain of {len}"),
        })?;
        warn!("Replacing block {index} in memory");
        *slot = block;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut_for_test(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MINING_SENDER;
    use crate::testkit::{coins, funded_store};

    #[test]
    fn test_new_store_holds_genesis_only() {
        let store = LedgerStore::new("Shakeel");
        assert_eq!(store.len(), 1);
        assert_eq!(store.blocks()[0], Block::genesis());
        assert!(store.pending().is_empty());
        assert_eq!(store.list_participants(), vec!["Shakeel".to_string()]);
        assert!(store.verify());
    }

    #[test]
    fn test_zero_balance_for_unknown_participant() {
        let store = LedgerStore::new("Shakeel");
        assert_eq!(store.balance("Shakeel"), Amount::ZERO);
        assert_eq!(store.balance("Max"), Amount::ZERO);
    }

    #[test]
    fn test_submit_without_funds_is_rejected() {
        let mut store = LedgerStore::new("Shakeel");
        let result = store.submit_transaction("Shakeel", "Max", coins(3));
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                required: coins(3),
                available: Amount::ZERO,
            })
        );
        assert!(store.pending().is_empty());
        assert_eq!(store.list_participants(), vec!["Shakeel".to_string()]);
    }

    #[test]
    fn test_submit_invalid_amount_leaves_state_untouched() {
        let mut store = funded_store("Shakeel", 1);
        let before = store.export_state();
        assert!(matches!(
            store.submit_transaction("Shakeel", "Max", Amount::ZERO),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            store.submit_transaction(MINING_SENDER, "Max", coins(1)),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert_eq!(store.export_state(), before);
    }

    #[test]
    fn test_submit_debits_sender_only_until_mined() {
        let mut store = funded_store("Shakeel", 1);
        store.submit_transaction("Shakeel", "Max", coins(5)).unwrap();

        assert_eq!(store.balance("Shakeel"), coins(5));
        assert_eq!(store.balance("Max"), Amount::ZERO);
        assert_eq!(
            store.list_participants(),
            vec!["Max".to_string(), "Shakeel".to_string()]
        );
    }

    #[test]
    fn test_pending_sends_prevent_double_spend() {
        let mut store = funded_store("Shakeel", 1);
        store.submit_transaction("Shakeel", "Max", coins(6)).unwrap();
        let second = store.submit_transaction("Shakeel", "Anna", coins(6));
        assert!(matches!(second, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(store.pending().len(), 1);
    }

    #[test]
    fn test_mine_moves_pool_into_block_in_order() {
        let mut store = funded_store("Shakeel", 1);
        store.submit_transaction("Shakeel", "Max", coins(2)).unwrap();
        store.submit_transaction("Shakeel", "Anna", coins(3)).unwrap();
        let queued = store.pending().to_vec();

        let block = store.mine().unwrap();
        let txs = block.get_transactions();
        assert_eq!(txs.len(), 3);
        assert_eq!(&txs[..2], queued.as_slice());
        assert_eq!(txs[2], Transaction::reward("Shakeel"));
        assert_eq!(block.get_index(), 2);
        assert_eq!(block.get_previous_hash(), store.blocks()[1].digest());

        // The pool is the caller's to clear
        assert_eq!(store.pending().len(), 2);
        store.clear_pending();
        assert!(store.pending().is_empty());
        assert!(store.verify());
    }

    #[test]
    fn test_mine_with_empty_pool_yields_reward_only_block() {
        let mut store = LedgerStore::new("Shakeel");
        let block = store.mine().unwrap();
        assert_eq!(block.get_transactions(), &[Transaction::reward("Shakeel")][..]);
        assert_eq!(store.balance("Shakeel"), coins(10));
        assert!(store.verify());
    }

    #[test]
    fn test_cancelled_mining_changes_nothing() {
        let mut store = funded_store("Shakeel", 1);
        store.submit_transaction("Shakeel", "Max", coins(1)).unwrap();
        let before = store.export_state();

        let token = CancelToken::new();
        token.cancel();
        assert_eq!(store.mine_with_cancel(&token), Err(LedgerError::MiningCancelled));
        assert_eq!(store.export_state(), before);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let mut store = funded_store("Shakeel", 3);
        assert!(store.verify());
        store.blocks_mut_for_test()[1]
            .transactions_mut_for_test()[0]
            .set_recipient_for_test("Mallory");
        assert!(!store.verify());
        assert!(matches!(
            store.check_integrity(),
            Err(LedgerError::ChainIntegrityViolation { .. })
        ));
    }

    #[test]
    fn test_verify_all_pending_after_submissions() {
        let mut store = funded_store("Shakeel", 2);
        store.submit_transaction("Shakeel", "Max", coins(15)).unwrap();
        store.submit_transaction("Shakeel", "Anna", coins(5)).unwrap();
        assert!(store.verify_all_pending());
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = funded_store("Shakeel", 2);
        store.submit_transaction("Shakeel", "Max", coins(4)).unwrap();
        let (ledger, pending) = store.export_state();
        let digests: Vec<String> = store.blocks().iter().map(Block::digest).collect();

        let mut restored = LedgerStore::new("Shakeel");
        restored.import_state(ledger, pending).unwrap();

        assert!(restored.verify());
        assert_eq!(restored.blocks(), store.blocks());
        assert_eq!(restored.pending(), store.pending());
        let restored_digests: Vec<String> = restored.blocks().iter().map(Block::digest).collect();
        assert_eq!(restored_digests, digests);
        assert_eq!(restored.list_participants(), store.list_participants());
    }

    #[test]
    fn test_import_rejects_broken_chain() {
        let mut source = funded_store("Shakeel", 3);
        source.blocks_mut_for_test()[1].set_proof_for_test(7_000_000);
        let (ledger, pending) = source.export_state();

        let mut target = funded_store("Shakeel", 1);
        let before = target.export_state();
        assert!(matches!(
            target.import_state(ledger, pending),
            Err(LedgerError::ChainIntegrityViolation { .. })
        ));
        assert_eq!(target.export_state(), before);
    }

    #[test]
    fn test_import_rejects_reward_in_pending() {
        let mut store = LedgerStore::new("Shakeel");
        let pending = PendingSnapshot {
            transactions: vec![Transaction::reward("Shakeel")],
        };
        let ledger = LedgerSnapshot {
            blocks: vec![Block::genesis()],
        };
        assert!(matches!(
            store.import_state(ledger, pending),
            Err(LedgerError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_import_rejects_pending_without_identifiers() {
        let mut store = funded_store("Shakeel", 1);
        let before = store.export_state();
        let participants = store.list_participants();

        let pending: PendingSnapshot =
            serde_json::from_str(r#"[{"sender":"","recipient":"","amount":"1"}]"#).unwrap();
        let ledger = LedgerSnapshot {
            blocks: vec![Block::genesis()],
        };
        assert!(matches!(
            store.import_state(ledger, pending),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert_eq!(store.export_state(), before);
        assert_eq!(store.list_participants(), participants);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_replace_block_breaks_audit() {
        let mut store = funded_store("Shakeel", 1);
        let forged = Block::new(0, String::new(), vec![Transaction::reward("Mallory")], 100);
        store.replace_block(0, forged).unwrap();
        assert!(matches!(
            store.check_integrity(),
            Err(LedgerError::ChainIntegrityViolation { index: 0, .. })
        ));
        assert!(store.replace_block(5, Block::genesis()).is_err());
    }

    #[test]
    fn test_scenario_from_empty_ledger() {
        let mut store = LedgerStore::new("Shakeel");
        assert_eq!(store.balance("Shakeel"), Amount::ZERO);

        assert!(matches!(
            store.submit_transaction("Shakeel", "Max", coins(3)),
            Err(LedgerError::InsufficientFunds { .. })
        ));

        store.mine().unwrap();
        store.clear_pending();
        assert_eq!(store.balance("Shakeel"), coins(10));

        store.submit_transaction("Shakeel", "Max", coins(3)).unwrap();
        store.mine().unwrap();
        store.clear_pending();

        assert!(store.verify());
        assert_eq!(store.balance("Max"), coins(3));
        assert_eq!(store.balance("Shakeel"), coins(17));
    }
}
