//! TOTP generation and verification.
//!
//! Uses RFC 6238 TOTP with SHA-1 (industry standard for authenticator apps),
//! 6-digit codes, 30-second time steps. Verification uses constant-time
//! comparison via the `subtle` crate and checks every counter in the window.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::codec::hex_to_base32;
use crate::error::CryptoError;

/// Time step in seconds.
pub const STEP_SECS: u64 = 30;

/// Number of digits in a code.
pub const DIGITS: usize = 6;

/// Default verification tolerance, in steps either side of now.
pub const DEFAULT_WINDOW: u64 = 1;

/// Largest accepted window; wider requests are clamped to it.
pub const MAX_WINDOW: u64 = 10;

/// Source of the current Unix time.
pub trait Clock: Send + Sync {
    fn unix_secs(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// A frozen timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_secs(&self) -> u64 {
        self.0
    }
}

/// A generated code and how long it stays current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpCode {
    pub code: String,
    /// Seconds until the step rolls over, in `1..=30`.
    pub remaining_secs: u64,
}

/// Step counter for a Unix timestamp.
pub fn counter_at(unix_secs: u64) -> u64 {
    unix_secs / STEP_SECS
}

/// Seconds left in the step containing `unix_secs`.
pub fn remaining_secs_at(unix_secs: u64) -> u64 {
    STEP_SECS - (unix_secs % STEP_SECS)
}

/// Stateless TOTP engine over an injectable clock.
#[derive(Debug, Clone, Default)]
pub struct TotpEngine<C = SystemClock> {
    clock: C,
}

impl TotpEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> TotpEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Generate the current code for a hex seed.
    pub fn generate(&self, seed_hex: &str) -> Result<TotpCode, CryptoError> {
        let totp = build_totp(seed_hex)?;
        // Single clock read so code and remaining time agree.
        let now = self.clock.unix_secs();
        Ok(TotpCode {
            code: totp.generate(counter_at(now) * STEP_SECS),
            remaining_secs: remaining_secs_at(now),
        })
    }

    /// Verify a candidate against `[counter - window, counter + window]`.
    /// `window` is clamped to [`MAX_WINDOW`].
    ///
    /// Malformed candidates return `Ok(false)` before the seed is touched.
    /// A malformed seed is a `FormatError`.
    pub fn verify(&self, seed_hex: &str, candidate: &str, window: u64) -> Result<bool, CryptoError> {
        if !is_well_formed_code(candidate) {
            return Ok(false);
        }

        let totp = build_totp(seed_hex)?;
        let counter = counter_at(self.clock.unix_secs());
        let window = window.min(MAX_WINDOW);
        let first = counter.saturating_sub(window);
        let last = counter.saturating_add(window);

        let mut matched = Choice::from(0u8);
        for c in first..=last {
            let expected = totp.generate(c.saturating_mul(STEP_SECS));
            matched |= expected.as_bytes().ct_eq(candidate.as_bytes());
        }
        Ok(matched.into())
    }
}

/// Code for an explicit step counter.
pub fn code_at(seed_hex: &str, counter: u64) -> Result<String, CryptoError> {
    let time = counter
        .checked_mul(STEP_SECS)
        .ok_or_else(|| CryptoError::Totp(format!("counter {counter} out of range")))?;
    let totp = build_totp(seed_hex)?;
    Ok(totp.generate(time))
}

/// Exactly six ASCII digits.
pub fn is_well_formed_code(candidate: &str) -> bool {
    candidate.len() == DIGITS && candidate.bytes().all(|b| b.is_ascii_digit())
}

/// Build a totp-rs TOTP instance from a hex seed via its base-32 form.
fn build_totp(seed_hex: &str) -> Result<TOTP, CryptoError> {
    let encoded = hex_to_base32(seed_hex)?;
    let secret = Secret::Encoded(encoded)
        .to_bytes()
        .map_err(|_| CryptoError::Base32)?;

    TOTP::new(Algorithm::SHA1, DIGITS, 1, STEP_SECS, secret)
        .map_err(|e| CryptoError::Totp(e.to_string()))
}
