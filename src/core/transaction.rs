// A transaction moves an amount from one account identifier to another.
// Field order (sender, recipient, amount) is fixed by the struct layout, so every
// encoding of a transaction sees the fields in the same order.

use crate::core::{Amount, MINING_REWARD};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Sender identifier reserved for reward transactions
pub const MINING_SENDER: &str = "MINING";

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: Amount,
}

impl Transaction {
    pub fn new(sender: &str, recipient: &str, amount: Amount) -> Result<Transaction> {
        let transaction = Transaction {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        };
        transaction.validate()?;
        Ok(transaction)
    }

    // A regular transfer: both identifiers present, amount strictly positive,
    // and the reserved reward sender is off limits. Decoded transactions never
    // pass through `new`, so loaders call this directly.
    pub fn validate(&self) -> Result<()> {
        if self.sender.is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "sender must not be empty".to_string(),
            ));
        }
        if self.recipient.is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "recipient must not be empty".to_string(),
            ));
        }
        if self.is_reward() {
            return Err(LedgerError::InvalidTransaction(format!(
                "sender '{MINING_SENDER}' is reserved for mining rewards"
            )));
        }
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }

    /// The reward paid to `recipient` for mining a block
    pub fn reward(recipient: &str) -> Transaction {
        Transaction {
            sender: MINING_SENDER.to_string(),
            recipient: recipient.to_string(),
            amount: MINING_REWARD,
        }
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> Amount {
        self.amount
    }

    pub fn is_reward(&self) -> bool {
        self.sender == MINING_SENDER
    }

    /// True iff the sender's balance, as reported by `balance_of`, covers the amount
    pub fn is_affordable<F>(&self, balance_of: F) -> bool
    where
        F: FnOnce(&str) -> Amount,
    {
        balance_of(self.sender.as_str()) >= self.amount
    }

    /// Canonical bytes: length-prefixed sender, length-prefixed recipient, amount
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut data_bytes = vec![];
        append_str(&mut data_bytes, &self.sender);
        append_str(&mut data_bytes, &self.recipient);
        data_bytes.extend(self.amount.to_be_bytes());
        data_bytes
    }

    #[cfg(test)]
    pub(crate) fn set_amount_for_test(&mut self, amount: Amount) {
        self.amount = amount;
    }

    #[cfg(test)]
    pub(crate) fn set_recipient_for_test(&mut self, recipient: &str) {
        self.recipient = recipient.to_string();
    }
}

/// Length prefix (u64 big-endian) followed by the UTF-8 bytes
pub(crate) fn append_str(data_bytes: &mut Vec<u8>, value: &str) {
    data_bytes.extend((value.len() as u64).to_be_bytes());
    data_bytes.extend(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_fields() {
        let tx = Transaction::new("Shakeel", "Max", Amount::from_coins(3)).unwrap();
        assert_eq!(tx.get_sender(), "Shakeel");
        assert_eq!(tx.get_recipient(), "Max");
        assert_eq!(tx.get_amount(), Amount::from_coins(3));
        assert!(!tx.is_reward());
    }

    #[test]
    fn test_new_rejects_non_positive_amount() {
        let zero = Transaction::new("Shakeel", "Max", Amount::ZERO);
        assert!(matches!(zero, Err(LedgerError::InvalidAmount(_))));

        let negative = Transaction::new("Shakeel", "Max", Amount::from_coins(-1));
        assert!(matches!(negative, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_new_rejects_malformed_identifiers() {
        assert!(matches!(
            Transaction::new("", "Max", Amount::from_coins(1)),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert!(matches!(
            Transaction::new("Shakeel", "", Amount::from_coins(1)),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert!(matches!(
            Transaction::new(MINING_SENDER, "Max", Amount::from_coins(1)),
            Err(LedgerError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_validate_catches_decoded_transfers() {
        let decoded: Transaction =
            serde_json::from_str(r#"{"sender":"","recipient":"Max","amount":"1"}"#).unwrap();
        assert!(matches!(
            decoded.validate(),
            Err(LedgerError::InvalidTransaction(_))
        ));

        let decoded: Transaction =
            serde_json::from_str(r#"{"sender":"Shakeel","recipient":"","amount":"1"}"#).unwrap();
        assert!(matches!(
            decoded.validate(),
            Err(LedgerError::InvalidTransaction(_))
        ));

        let decoded: Transaction =
            serde_json::from_str(r#"{"sender":"Shakeel","recipient":"Max","amount":"0"}"#)
                .unwrap();
        assert!(matches!(decoded.validate(), Err(LedgerError::InvalidAmount(_))));

        assert!(Transaction::reward("Shakeel").validate().is_err());
        let ok = Transaction::new("Shakeel", "Max", Amount::from_coins(1)).unwrap();
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn test_reward_transaction() {
        let reward = Transaction::reward("Shakeel");
        assert!(reward.is_reward());
        assert_eq!(reward.get_sender(), MINING_SENDER);
        assert_eq!(reward.get_amount(), MINING_REWARD);
    }

    #[test]
    fn test_is_affordable() {
        let tx = Transaction::new("Shakeel", "Max", Amount::from_coins(5)).unwrap();
        assert!(tx.is_affordable(|_| Amount::from_coins(5)));
        assert!(tx.is_affordable(|_| Amount::from_coins(6)));
        assert!(!tx.is_affordable(|_| Amount::from_coins(4)));
        assert!(tx.is_affordable(|who| {
            assert_eq!(who, "Shakeel");
            Amount::from_coins(10)
        }));
    }

    #[test]
    fn test_canonical_bytes_depend_on_every_field() {
        let base = Transaction::new("Shakeel", "Max", Amount::from_coins(3)).unwrap();
        let other_recipient = Transaction::new("Shakeel", "Maxi", Amount::from_coins(3)).unwrap();
        let other_amount = Transaction::new("Shakeel", "Max", Amount::from_units(300_000_001)).unwrap();
        assert_eq!(base.canonical_bytes(), base.clone().canonical_bytes());
        assert_ne!(base.canonical_bytes(), other_recipient.canonical_bytes());
        assert_ne!(base.canonical_bytes(), other_amount.canonical_bytes());
    }

    #[test]
    fn test_length_prefix_separates_fields() {
        // "ab"+"c" and "a"+"bc" must not collide
        let left = Transaction::new("ab", "c", Amount::from_coins(1)).unwrap();
        let right = Transaction::new("a", "bc", Amount::from_coins(1)).unwrap();
        assert_ne!(left.canonical_bytes(), right.canonical_bytes());
    }

    #[test]
    fn test_json_field_order() {
        let tx = Transaction::new("Shakeel", "Max", Amount::from_coins(3)).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(
            json,
            r#"{"sender":"Shakeel","recipient":"Max","amount":"3.00000000"}"#
        );
    }
}
