//! Seed encodings: canonical hex, raw bytes and unpadded base-32.

use seedgate_common::encoding::{hex_decode, hex_encode};
use totp_rs::Secret;

use crate::error::CryptoError;

/// Seed length in bytes (256 bits).
pub const SEED_LEN: usize = 32;

/// Length of the canonical hex form.
pub const SEED_HEX_LEN: usize = SEED_LEN * 2;

/// Trim, lowercase and validate a hex seed, returning its canonical form.
pub fn normalize_seed_hex(input: &str) -> Result<String, CryptoError> {
    let trimmed = input.trim();
    let len = trimmed.chars().count();
    if len != SEED_HEX_LEN {
        return Err(CryptoError::SeedLength { len });
    }

    let canonical = trimmed.to_ascii_lowercase();
    if !canonical.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(CryptoError::SeedCharset);
    }
    Ok(canonical)
}

/// Decode a 64-character hex seed into its 32 raw bytes.
pub fn hex_to_bytes(hex: &str) -> Result<[u8; SEED_LEN], CryptoError> {
    let canonical = normalize_seed_hex(hex)?;
    let bytes = hex_decode(&canonical).map_err(|_| CryptoError::SeedCharset)?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| CryptoError::SeedLength { len: v.len() * 2 })
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex_encode(bytes)
}

/// RFC 4648 base-32 with the padding stripped.
pub fn bytes_to_base32_nopad(bytes: &[u8]) -> String {
    Secret::Raw(bytes.to_vec())
        .to_encoded()
        .to_string()
        .trim_end_matches('=')
        .to_string()
}

/// Bridge a hex seed into the base-32 form consumed by the TOTP algorithm.
pub fn hex_to_base32(hex: &str) -> Result<String, CryptoError> {
    let bytes = hex_to_bytes(hex)?;
    Ok(bytes_to_base32_nopad(&bytes))
}
