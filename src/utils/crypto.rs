use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA256};

/// Length of a rendered SHA-256 digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// SHA-256 of `data` as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    HEXLOWER.encode(&sha256_digest(data))
}
