use crate::core::{Amount, Transaction};

/// Unconfirmed transactions in arrival order.
///
/// The pool never reorders or deduplicates; it is only ever appended to or
/// emptied as a whole once its contents have been mined into a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPool {
    inner: Vec<Transaction>,
}

impl PendingPool {
    pub fn new() -> PendingPool {
        PendingPool { inner: vec![] }
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> PendingPool {
        PendingPool {
            inner: transactions,
        }
    }

    pub fn push(&mut self, tx: Transaction) {
        self.inner.push(tx);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        self.inner.as_slice()
    }

    /// Total amount `participant` has committed to unconfirmed outgoing transactions
    pub fn sent_by(&self, participant: &str) -> Amount {
        self.inner
            .iter()
            .filter(|tx| tx.get_sender() == participant)
            .map(|tx| tx.get_amount())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Transaction> {
        self.inner.clone()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<'a> IntoIterator for &'a PendingPool {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
