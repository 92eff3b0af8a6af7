//! Commit attestations: RSA-PSS signature, then RSA-OAEP encryption to a
//! recipient.
//!
//! Only the recipient can recover the signature; once recovered it is
//! verified against the signer's public key over the plaintext hash.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pss::{BlindedSigningKey, Signature, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::Oaep;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey};
use crate::seed::{decode_base64, oaep_decrypt};

/// Length of a full SHA-1 revision id.
pub const COMMIT_HASH_LEN: usize = 40;

/// SHA-256 output length.
const DIGEST_LEN: usize = 32;

/// Signed and encrypted proof of authorship for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAttestation {
    pub commit_hash: String,
    pub encrypted_signature_b64: String,
}

/// Maximum PSS salt length for a modulus of `modulus_bits`.
///
/// `emLen - hLen - 2` with `emLen = ceil((modBits - 1) / 8)`, the same
/// convention OpenSSL uses for `RSA_PSS_SALTLEN_MAX`.
pub fn pss_max_salt_len(modulus_bits: usize) -> usize {
    let em_len = modulus_bits.saturating_sub(1).div_ceil(8);
    em_len.saturating_sub(DIGEST_LEN + 2)
}

/// Produce an attestation for `commit_hash`.
pub fn attest(
    commit_hash: &str,
    signing_key: &PrivateKey,
    recipient: &PublicKey,
) -> Result<CommitAttestation, CryptoError> {
    check_commit_hash(commit_hash)?;

    let signature = sign_commit(commit_hash, signing_key)?;
    let encrypted = recipient
        .rsa()
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &signature)
        .map_err(|e| {
            tracing::debug!(
                error = %e,
                signature_len = signature.len(),
                recipient_bits = recipient.bits(),
                "Signature encryption failed"
            );
            CryptoError::Encryption
        })?;

    Ok(CommitAttestation {
        commit_hash: commit_hash.to_string(),
        encrypted_signature_b64: STANDARD.encode(encrypted),
    })
}

/// RSA-PSS (SHA-256, MGF1-SHA-256, maximum salt) over the hash text.
pub fn sign_commit(commit_hash: &str, signing_key: &PrivateKey) -> Result<Vec<u8>, CryptoError> {
    let salt_len = pss_max_salt_len(signing_key.bits());
    let key = BlindedSigningKey::<Sha256>::new_with_salt_len(signing_key.rsa().clone(), salt_len);
    let signature = key
        .try_sign_with_rng(&mut OsRng, commit_hash.as_bytes())
        .map_err(|_| CryptoError::Signing)?;
    Ok(signature.to_vec())
}

/// Verify a raw PSS signature over `commit_hash`.
pub fn verify_commit_signature(
    commit_hash: &str,
    signature: &[u8],
    signer: &PublicKey,
) -> Result<(), CryptoError> {
    let salt_len = pss_max_salt_len(signer.bits());
    let key = VerifyingKey::<Sha256>::new_with_salt_len(signer.rsa().clone(), salt_len);
    let signature = Signature::try_from(signature).map_err(|_| CryptoError::SignatureInvalid)?;
    key.verify(commit_hash.as_bytes(), &signature)
        .map_err(|_| CryptoError::SignatureInvalid)
}

/// Recipient side: decrypt the signature and verify it against the signer.
pub fn open_attestation(
    attestation: &CommitAttestation,
    recipient: &PrivateKey,
    signer: &PublicKey,
) -> Result<(), CryptoError> {
    check_commit_hash(&attestation.commit_hash)?;
    let ciphertext = decode_base64(&attestation.encrypted_signature_b64)?;
    let signature = oaep_decrypt(&ciphertext, recipient)?;
    verify_commit_signature(&attestation.commit_hash, &signature, signer)
}

fn check_commit_hash(commit_hash: &str) -> Result<(), CryptoError> {
    let len = commit_hash.chars().count();
    if len != COMMIT_HASH_LEN {
        return Err(CryptoError::CommitHashLength { len });
    }
    Ok(())
}
