//! Shared helpers for unit tests
//!
//! Builds ledgers with known balances and throwaway storage locations so
//! each test starts from an isolated, deterministic state.

pub mod test_utils;

pub use test_utils::*;
