//! RSA key loading from PEM.
//!
//! Keys are parsed once and never mutated afterwards, so a loaded key can be
//! shared read-only behind an `Arc`. Neither wrapper exposes key material
//! through `Debug`; the private key's limbs are zeroized by `rsa` on drop.

use std::fmt;
use std::path::Path;

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::CryptoError;

const PKCS1_PRIVATE_LABEL: &str = "BEGIN RSA PRIVATE KEY";
const PKCS1_PUBLIC_LABEL: &str = "BEGIN RSA PUBLIC KEY";

/// RSA private key used for seed decryption and commit signing.
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    pub(crate) fn rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }

    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.to_public_key(),
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.inner.n().bits()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// RSA public key used for attestation encryption and verification.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.inner
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.inner.n().bits()
    }

    /// Modulus size in bytes (the length of every ciphertext/signature).
    pub fn size(&self) -> usize {
        self.inner.size()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// Parse an unencrypted PEM private key (PKCS#8 or PKCS#1).
pub fn private_key_from_pem(pem: &[u8]) -> Result<PrivateKey, CryptoError> {
    let text = pem_text(pem)?;
    let inner = if text.contains(PKCS1_PRIVATE_LABEL) {
        RsaPrivateKey::from_pkcs1_pem(text).map_err(|e| CryptoError::KeyParse(e.to_string()))?
    } else {
        RsaPrivateKey::from_pkcs8_pem(text).map_err(|e| CryptoError::KeyParse(e.to_string()))?
    };
    Ok(PrivateKey { inner })
}

/// Parse a PEM public key (SubjectPublicKeyInfo or PKCS#1).
pub fn public_key_from_pem(pem: &[u8]) -> Result<PublicKey, CryptoError> {
    let text = pem_text(pem)?;
    let inner = if text.contains(PKCS1_PUBLIC_LABEL) {
        RsaPublicKey::from_pkcs1_pem(text).map_err(|e| CryptoError::KeyParse(e.to_string()))?
    } else {
        RsaPublicKey::from_public_key_pem(text)
            .map_err(|e| CryptoError::KeyParse(e.to_string()))?
    };
    Ok(PublicKey { inner })
}

/// Load a private key from a PEM file.
pub fn load_private_key(path: &Path) -> Result<PrivateKey, CryptoError> {
    let pem = read_key_file(path)?;
    let key = private_key_from_pem(&pem)?;
    tracing::debug!(path = %path.display(), bits = key.bits(), "Private key loaded");
    Ok(key)
}

/// Load a public key from a PEM file.
pub fn load_public_key(path: &Path) -> Result<PublicKey, CryptoError> {
    let pem = read_key_file(path)?;
    let key = public_key_from_pem(&pem)?;
    tracing::debug!(path = %path.display(), bits = key.bits(), "Public key loaded");
    Ok(key)
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, CryptoError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CryptoError::KeyNotFound(path.to_path_buf()))
        }
        Err(e) => Err(CryptoError::KeyIo(e)),
    }
}

fn pem_text(pem: &[u8]) -> Result<&str, CryptoError> {
    std::str::from_utf8(pem)
        .map(str::trim)
        .map_err(|_| CryptoError::KeyParse("PEM is not valid UTF-8".into()))
}
