//! Fixed-point monetary amounts
//!
//! Amounts are counted in minor units, 100,000,000 per coin, the same split
//! Bitcoin uses between satoshis and coins. Keeping them as integers means
//! an amount survives any number of save/load cycles unchanged, which matters
//! because every amount feeds into a block digest.
//!
//! ## Textual form
//! - Parsing accepts `"3"`, `"2.5"` or `"0.00000001"`
//! - Display always renders 8 fractional digits: `"10.00000000"`
//! - JSON uses the same decimal string, bincode stores the raw integer

use crate::error::{LedgerError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of minor units in one coin
pub const UNITS_PER_COIN: i64 = 100_000_000;

/// Digits after the decimal point
const FRACTION_DIGITS: usize = 8;

/// Reward credited to the node owner for every mined block (10 coins)
pub const MINING_REWARD: Amount = Amount::from_coins(10);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_units(units: i64) -> Amount {
        Amount(units)
    }

    pub const fn from_coins(coins: i64) -> Amount {
        Amount(coins.saturating_mul(UNITS_PER_COIN))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Big-endian bytes of the minor-unit count, used by the hashing module
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_coin = UNITS_PER_COIN as u64;
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / per_coin,
            abs % per_coin,
            width = FRACTION_DIGITS
        )
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Amount> {
        let text = s.trim();
        if text.is_empty() {
            return Err(LedgerError::InvalidAmount("amount is empty".to_string()));
        }
        if text.starts_with('-') {
            return Err(LedgerError::InvalidAmount(format!(
                "amount must not be negative: {text}"
            )));
        }

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || !all_digits(whole)
            || !all_digits(fraction)
            || (text.contains('.') && fraction.is_empty())
        {
            return Err(LedgerError::InvalidAmount(format!(
                "not a decimal number: {text}"
            )));
        }
        if fraction.len() > FRACTION_DIGITS {
            return Err(LedgerError::InvalidAmount(format!(
                "at most {FRACTION_DIGITS} fractional digits allowed: {text}"
            )));
        }

        let overflow = || LedgerError::InvalidAmount(format!("amount too large: {text}"));
        let whole_units = whole
            .parse::<i64>()
            .map_err(|_| overflow())?
            .checked_mul(UNITS_PER_COIN)
            .ok_or_else(overflow)?;
        let fraction_units = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<width$}", width = FRACTION_DIGITS);
            padded.parse::<i64>().map_err(|_| overflow())?
        };

        whole_units
            .checked_add(fraction_units)
            .map(Amount)
            .ok_or_else(overflow)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal string with at most 8 fractional digits")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        v.parse::<Amount>().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Amount, D::Error> {
        deserializer.deserialize_str(AmountVisitor)
    }
}
