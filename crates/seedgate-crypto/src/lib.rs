//! Seedgate Crypto: the cryptographic core.
//!
//! Provides RSA key loading, seed decryption (RSA-OAEP) with strict
//! validation, TOTP generation/verification over an injectable clock, and
//! sign-then-encrypt commit attestations (RSA-PSS + RSA-OAEP).

pub mod codec;
pub mod error;
pub mod keys;
pub mod proof;
pub mod seed;
pub mod totp;

#[cfg(test)]
pub(crate) mod test_keys;

pub use error::CryptoError;
pub use keys::{PrivateKey, PublicKey};
pub use proof::CommitAttestation;
pub use seed::Seed;
pub use totp::{Clock, FixedClock, SystemClock, TotpCode, TotpEngine};
