//! Wire types for the HTTP API.
//!
//! These types define the JSON shapes of the public API contract.

use serde::{Deserialize, Serialize};

/// POST /decrypt-seed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecryptSeedRequest {
    /// Base64 RSA-OAEP ciphertext of the hex seed.
    pub encrypted_seed: String,
}

/// Generic success acknowledgement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// GET /generate-2fa response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub code: String,
    /// Seconds the code remains current.
    pub valid_for: u64,
}

impl From<seedgate_crypto::TotpCode> for GenerateResponse {
    fn from(code: seedgate_crypto::TotpCode) -> Self {
        Self {
            code: code.code,
            valid_for: code.remaining_secs,
        }
    }
}

/// POST /verify-2fa request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: Option<String>,
}

/// POST /verify-2fa response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,
}
