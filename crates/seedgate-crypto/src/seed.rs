//! Seed provisioning: RSA-OAEP decryption and strict validation.
//!
//! Pipeline: strict Base64 → OAEP(SHA-256, MGF1-SHA-256, no label) →
//! UTF-8 → trim → 64 lowercase hex characters.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::Oaep;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::codec::normalize_seed_hex;
use crate::error::CryptoError;
use crate::keys::PrivateKey;

/// A validated 32-byte seed in canonical 64-character lowercase hex.
///
/// Zeroized on drop; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    hex: String,
}

impl Seed {
    /// Validate seed text (trim, lowercase, 64 hex chars).
    ///
    /// Used both for freshly decrypted plaintext and for seeds read back
    /// from storage.
    pub fn parse(text: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            hex: normalize_seed_hex(text)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.hex.zeroize();
    }
}

/// Decrypt and validate a Base64 RSA-OAEP encrypted seed.
pub fn decrypt_seed(encrypted_b64: &str, key: &PrivateKey) -> Result<Seed, CryptoError> {
    let ciphertext = decode_base64(encrypted_b64)?;
    let mut plaintext = oaep_decrypt(&ciphertext, key)?;
    let result = seed_from_plaintext(&plaintext);
    plaintext.zeroize();
    result
}

/// Strict standard-alphabet Base64 with canonical padding.
pub(crate) fn decode_base64(input: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD.decode(input).map_err(|_| CryptoError::Base64)
}

/// RSA-OAEP with SHA-256 for both the digest and MGF1, empty label.
///
/// Every failure maps to the same variant so callers cannot distinguish
/// a wrong key from corrupted ciphertext.
pub(crate) fn oaep_decrypt(ciphertext: &[u8], key: &PrivateKey) -> Result<Vec<u8>, CryptoError> {
    key.rsa()
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|_| CryptoError::Decryption)
}

fn seed_from_plaintext(plaintext: &[u8]) -> Result<Seed, CryptoError> {
    let text = std::str::from_utf8(plaintext).map_err(|_| CryptoError::Utf8)?;
    Seed::parse(text)
}
