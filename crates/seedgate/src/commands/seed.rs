//! Seed provisioning and TOTP commands.
//!
//! Failures print the same generic messages the HTTP API returns; the
//! detail goes to the log.

use std::io::Read;
use std::path::Path;

use seedgate_common::error::ErrorCode;
use seedgate_common::persist::{FileSeedStore, SeedStore, StoreError};
use seedgate_crypto::keys::load_private_key;
use seedgate_crypto::seed::decrypt_seed;
use seedgate_crypto::totp::{FixedClock, TotpEngine};

use crate::cli::Config;
use crate::commands::print_json;
use crate::protocol::{GenerateResponse, StatusResponse, VerifyResponse};

/// Exit status when the seed cannot be read.
pub const EXIT_SEED_UNREADABLE: i32 = 1;

/// Exit status when a code cannot be generated from the seed.
pub const EXIT_GENERATION_FAILED: i32 = 2;

// ── Decrypt ─────────────────────────────────────────────────────────

pub fn decrypt(config: &Config, input: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let encrypted = read_ciphertext(input)?;

    let key = load_private_key(&config.private_key_path).map_err(|e| {
        tracing::debug!(error = %e, path = %config.private_key_path.display(), "Private key unavailable");
        anyhow::anyhow!(ErrorCode::DecryptionFailed.message())
    })?;

    let seed = decrypt_seed(encrypted.trim(), &key).map_err(|e| {
        tracing::debug!(error = %e, kind = ?e.kind(), "Seed rejected");
        anyhow::anyhow!(ErrorCode::DecryptionFailed.message())
    })?;

    let store = FileSeedStore::new(&config.seed_path);
    store.store(seed.as_str()).map_err(|e| {
        tracing::debug!(error = %e, "Failed to save seed");
        anyhow::anyhow!(ErrorCode::DecryptionFailed.message())
    })?;

    if json {
        print_json(&StatusResponse::ok());
    } else {
        println!("Seed stored at {}", config.seed_path.display());
    }
    Ok(())
}

fn read_ciphertext(input: Option<&Path>) -> anyhow::Result<String> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if text.trim().is_empty() {
        anyhow::bail!("No encrypted seed provided.");
    }
    Ok(text)
}

// ── Code / verify ───────────────────────────────────────────────────

pub fn code(config: &Config, json: bool) -> anyhow::Result<()> {
    let seed = load_seed(&config.seed_path)?;
    let code = TotpEngine::new().generate(&seed).map_err(|e| {
        tracing::debug!(error = %e, "Stored seed is invalid");
        anyhow::anyhow!(ErrorCode::SeedUnavailable.message())
    })?;

    if json {
        print_json(&GenerateResponse::from(code));
    } else {
        println!("{}  (valid for {}s)", code.code, code.remaining_secs);
    }
    Ok(())
}

pub fn verify(config: &Config, candidate: &str, window: u64, json: bool) -> anyhow::Result<()> {
    if candidate.is_empty() {
        anyhow::bail!(ErrorCode::MissingCode.message());
    }
    let seed = load_seed(&config.seed_path)?;
    let valid = TotpEngine::new()
        .verify(&seed, candidate, window)
        .map_err(|e| {
            tracing::debug!(error = %e, "Stored seed is invalid");
            anyhow::anyhow!(ErrorCode::SeedUnavailable.message())
        })?;

    if json {
        print_json(&VerifyResponse { valid });
    } else if valid {
        println!("Code is valid.");
    } else {
        println!("Code is NOT valid.");
    }
    Ok(())
}

fn load_seed(path: &Path) -> anyhow::Result<String> {
    FileSeedStore::new(path).load().map_err(|e| {
        tracing::debug!(error = %e, "Seed not available");
        anyhow::anyhow!(ErrorCode::SeedUnavailable.message())
    })
}

// ── Scheduled logging ───────────────────────────────────────────────

/// Print one `YYYY-MM-DD HH:MM:SS 2FA Code: NNNNNN` line (UTC).
///
/// Returns the process exit status. Errors go to stderr with the same
/// timestamp prefix.
pub fn log_code(seed_path: &Path) -> i32 {
    match log_line(seed_path, chrono::Utc::now()) {
        Ok(line) => {
            println!("{line}");
            0
        }
        Err((status, line)) => {
            eprintln!("{line}");
            status
        }
    }
}

fn log_line(
    seed_path: &Path,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<String, (i32, String)> {
    let stamp = now.format("%Y-%m-%d %H:%M:%S");

    let seed = match FileSeedStore::new(seed_path).load() {
        Ok(seed) if seed.is_empty() => {
            return Err((EXIT_SEED_UNREADABLE, format!("{stamp} ERROR: Seed empty")));
        }
        Ok(seed) => seed,
        Err(StoreError::NotFound(_)) => {
            return Err((EXIT_SEED_UNREADABLE, format!("{stamp} ERROR: Seed file missing")));
        }
        Err(e) => return Err((EXIT_SEED_UNREADABLE, format!("{stamp} ERROR: {e}"))),
    };

    let engine = TotpEngine::with_clock(FixedClock(now.timestamp().max(0) as u64));
    match engine.generate(&seed) {
        Ok(code) => Ok(format!("{stamp} 2FA Code: {}", code.code)),
        Err(e) => Err((EXIT_GENERATION_FAILED, format!("{stamp} ERROR: {e}"))),
    }
}
