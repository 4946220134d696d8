//! Utility functions and helpers
//!
//! Hashing primitives and the encodings used by the persistence adapters.

pub mod crypto;
pub mod serialization;

pub use crypto::{sha256_digest, sha256_hex, DIGEST_HEX_LEN};
pub use serialization::{deserialize, from_json_line, serialize, to_json_line};
