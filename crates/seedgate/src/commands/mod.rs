//! CLI command handlers.
//!
//! - `seed`: provisioning and TOTP against the local seed store.
//! - `proof`: commit attestations.

pub mod proof;
pub mod seed;

/// Print a serializable value as JSON, handling serialization errors
/// gracefully instead of panicking.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize response: {e}"),
    }
}
