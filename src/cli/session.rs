// A session pairs the in-memory ledger with its durable store. Every mutating
// call saves and then audits the chain, so a caller never keeps working on a
// ledger that fails verification.

use crate::core::{Amount, Block, LedgerStore};
#[cfg(debug_assertions)]
use crate::core::{Transaction, GENESIS_PROOF};
use crate::error::Result;
use crate::storage::StateStore;
use log::{error, info};

pub struct Session {
    store: LedgerStore,
    state: Box<dyn StateStore>,
}

impl Session {
    /// Load the saved ledger, or start from genesis when nothing was saved
    pub fn open(owner: &str, state: Box<dyn StateStore>) -> Result<Session> {
        let mut store = LedgerStore::new(owner);
        match state.load()? {
            Some((ledger, pending)) => store.import_state(ledger, pending)?,
            None => info!("Starting a new ledger for {owner}"),
        }
        Ok(Session { store, state })
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.store
    }

    pub fn send(&mut self, sender: &str, recipient: &str, amount: Amount) -> Result<()> {
        self.store.submit_transaction(sender, recipient, amount)?;
        self.persist()?;
        self.ensure_valid()
    }

    /// Mine, then clear the pool and save both records in one write
    pub fn mine(&mut self) -> Result<Block> {
        let block = self.store.mine()?;
        self.store.clear_pending();
        self.persist()?;
        self.ensure_valid()?;
        Ok(block)
    }

    /// Swap the genesis block for a forged one holding a 100 coin transfer to
    /// the owner. Nothing is saved.
    #[cfg(debug_assertions)]
    pub fn manipulate_chain(&mut self) -> Result<()> {
        let owner = self.store.owner().to_string();
        let forged = Transaction::new("Chris", &owner, Amount::from_coins(100))?;
        self.store
            .replace_block(0, Block::new(0, String::new(), vec![forged], GENESIS_PROOF))
    }

    fn persist(&self) -> Result<()> {
        let (ledger, pending) = self.store.export_state();
        self.state.save(&ledger, &pending)
    }

    pub fn ensure_valid(&self) -> Result<()> {
        if let Err(e) = self.store.check_integrity() {
            error!("Ledger failed verification: {e}");
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::storage::JsonFileStore;
    use crate::testkit::{coins, temp_state_path};

    #[test]
    fn test_session_persists_across_reopen() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        {
            let mut session =
                Session::open("Shakeel", Box::new(JsonFileStore::new(&path))).unwrap();
            session.mine().unwrap();
            session.send("Shakeel", "Max", coins(4)).unwrap();
        }

        let session = Session::open("Shakeel", Box::new(JsonFileStore::new(&path))).unwrap();
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().pending().len(), 1);
        assert_eq!(session.ledger().balance("Shakeel"), coins(6));
        assert_eq!(
            session.ledger().list_participants(),
            vec!["Max".to_string(), "Shakeel".to_string()]
        );
    }

    #[test]
    fn test_mine_clears_pool_in_saved_state() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        let mut session = Session::open("Shakeel", Box::new(JsonFileStore::new(&path))).unwrap();
        session.mine().unwrap();
        session.send("Shakeel", "Max", coins(3)).unwrap();
        session.mine().unwrap();

        let (chain, pending) = JsonFileStore::new(&path).load().unwrap().unwrap();
        assert_eq!(chain.blocks.len(), 3);
        assert!(pending.transactions.is_empty());
    }

    #[test]
    fn test_rejected_send_does_not_write() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        let mut session = Session::open("Shakeel", Box::new(JsonFileStore::new(&path))).unwrap();
        assert!(matches!(
            session.send("Shakeel", "Max", coins(1)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert!(!path.exists());
    }
}
