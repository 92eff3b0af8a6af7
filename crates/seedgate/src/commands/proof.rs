//! Commit attestation commands.

use std::path::Path;
use std::process::Command;

use seedgate_crypto::keys::{load_private_key, load_public_key};
use seedgate_crypto::proof::{attest, open_attestation, COMMIT_HASH_LEN};
use seedgate_crypto::CommitAttestation;

use crate::cli::Config;
use crate::commands::print_json;

/// Sign the commit (default `HEAD`) and print the attestation as JSON.
pub fn proof(config: &Config, commit: Option<&str>) -> anyhow::Result<()> {
    let commit_hash = match commit {
        Some(hash) => hash.trim().to_string(),
        None => head_commit_hash()?,
    };

    let signer = load_private_key(&config.private_key_path)
        .map_err(|e| anyhow::anyhow!("Cannot load signing key: {e}"))?;
    let recipient = load_public_key(&config.recipient_key_path)
        .map_err(|e| anyhow::anyhow!("Cannot load recipient key: {e}"))?;

    let attestation = attest(&commit_hash, &signer, &recipient)?;
    tracing::debug!(commit = %attestation.commit_hash, "Attestation produced");

    println!("{}", serde_json::to_string_pretty(&attestation)?);
    Ok(())
}

/// Open an attestation as its recipient and check the signer's signature.
pub fn verify_proof(
    file: &Path,
    recipient_private_key: &Path,
    signer_key: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", file.display()))?;
    let attestation: CommitAttestation = serde_json::from_str(&text)?;

    let recipient = load_private_key(recipient_private_key)?;
    let signer = load_public_key(signer_key)?;

    let result = open_attestation(&attestation, &recipient, &signer);
    if json {
        print_json(&serde_json::json!({
            "commit_hash": attestation.commit_hash,
            "valid": result.is_ok(),
        }));
    } else if result.is_ok() {
        println!("Attestation valid for commit {}", attestation.commit_hash);
    }

    result.map_err(|e| anyhow::anyhow!("Attestation invalid: {e}"))
}

/// `git rev-parse HEAD` of the working directory.
fn head_commit_hash() -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .map_err(|e| anyhow::anyhow!("Failed to run git: {e}"))?;
    if !output.status.success() {
        anyhow::bail!(
            "git rev-parse HEAD failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    parse_commit_hash(&output.stdout)
}

fn parse_commit_hash(stdout: &[u8]) -> anyhow::Result<String> {
    let hash = String::from_utf8_lossy(stdout).trim().to_string();
    if hash.len() != COMMIT_HASH_LEN {
        anyhow::bail!("Invalid commit hash length: {}", hash.len());
    }
    Ok(hash)
}
