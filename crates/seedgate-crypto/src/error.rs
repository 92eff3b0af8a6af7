//! Crypto domain errors.
//!
//! Each validation stage has its own variant so tests and diagnostics can
//! tell them apart. Adapters collapse them through [`CryptoError::kind`].

use std::path::PathBuf;

use seedgate_common::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key not found: {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("key unreadable: {0}")]
    KeyIo(#[from] std::io::Error),

    #[error("key parse: {0}")]
    KeyParse(String),

    #[error("invalid base64")]
    Base64,

    #[error("RSA decryption failed")]
    Decryption,

    #[error("plaintext is not valid UTF-8")]
    Utf8,

    #[error("seed must be exactly 64 hex characters (got {len})")]
    SeedLength { len: usize },

    #[error("seed contains non-hex characters")]
    SeedCharset,

    #[error("invalid base32 secret")]
    Base32,

    #[error("totp: {0}")]
    Totp(String),

    #[error("commit hash must be exactly 40 characters (got {len})")]
    CommitHashLength { len: usize },

    #[error("signing failed")]
    Signing,

    #[error("encryption failed")]
    Encryption,

    #[error("signature does not verify")]
    SignatureInvalid,
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyNotFound(_) | Self::KeyIo(_) | Self::KeyParse(_) => ErrorKind::KeyLoad,
            Self::Base64
            | Self::Utf8
            | Self::SeedLength { .. }
            | Self::SeedCharset
            | Self::Base32
            | Self::Totp(_)
            | Self::CommitHashLength { .. } => ErrorKind::Format,
            Self::Decryption | Self::Signing | Self::Encryption | Self::SignatureInvalid => {
                ErrorKind::Decryption
            }
        }
    }
}
