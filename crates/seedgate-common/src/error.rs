use serde::{Deserialize, Serialize};

/// Coarse failure classes shared by every seedgate domain error.
///
/// Domain errors keep their stage-specific variants for diagnostics and
/// tests; adapters only ever look at the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed encoding, length or charset at any stage.
    Format,
    /// Key source missing or unparseable.
    KeyLoad,
    /// An RSA operation failed. Deliberately undifferentiated.
    Decryption,
    /// Persisted seed absent.
    NotFound,
}

/// Machine-readable error codes for the wire protocol.
///
/// These are the only failure signals that cross the trust boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MissingCode,
    InvalidPayload,
    DecryptionFailed,
    SeedUnavailable,
}

impl ErrorCode {
    /// Suggested HTTP status code for this error.
    /// Transport-agnostic (returns u16, not an axum type).
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingCode | Self::InvalidPayload => 400,
            Self::DecryptionFailed | Self::SeedUnavailable => 500,
        }
    }

    /// Generic user-visible message. Never carries internal detail.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingCode => "Missing code",
            Self::InvalidPayload => "Invalid request payload",
            Self::DecryptionFailed => "Decryption failed",
            Self::SeedUnavailable => "Seed not decrypted yet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorCode::DecryptionFailed).unwrap(),
            "decryption_failed"
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::SeedUnavailable).unwrap(),
            "seed_unavailable"
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::MissingCode).unwrap(),
            "missing_code"
        );
    }

    #[test]
    fn all_error_code_variants_map_to_expected_http_status() {
        let cases = [
            (ErrorCode::MissingCode, 400),
            (ErrorCode::InvalidPayload, 400),
            (ErrorCode::DecryptionFailed, 500),
            (ErrorCode::SeedUnavailable, 500),
        ];
        for (code, expected_status) in &cases {
            assert_eq!(
                code.http_status(),
                *expected_status,
                "{code:?} should map to HTTP {expected_status}"
            );
        }
    }

    #[test]
    fn boundary_messages_are_generic() {
        assert_eq!(ErrorCode::DecryptionFailed.message(), "Decryption failed");
        assert_eq!(ErrorCode::SeedUnavailable.message(), "Seed not decrypted yet");
    }

    #[test]
    fn error_code_round_trips_through_json() {
        for code in [
            ErrorCode::MissingCode,
            ErrorCode::InvalidPayload,
            ErrorCode::DecryptionFailed,
            ErrorCode::SeedUnavailable,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            let back: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code, "\"{json}\" should deserialize back to {code:?}");
        }
    }
}
