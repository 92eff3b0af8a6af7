use std::path::{Path, PathBuf};

/// Container volume that, when mounted, holds the provisioned seed.
const CONTAINER_DATA_DIR: &str = "/data";

/// Relative data directory used for local runs.
const LOCAL_DATA_DIR: &str = "data";

const SEED_FILENAME: &str = "seed.txt";

/// Default location of the persisted seed.
///
/// - `/data/seed.txt` when a `/data` volume exists (container deployments)
/// - `data/seed.txt` relative to the working directory otherwise
pub fn default_seed_path() -> PathBuf {
    seed_path_under(Path::new(CONTAINER_DATA_DIR))
}

/// Seed path selection with an injectable container root, for tests.
pub fn seed_path_under(container_dir: &Path) -> PathBuf {
    if container_dir.is_dir() {
        container_dir.join(SEED_FILENAME)
    } else {
        PathBuf::from(LOCAL_DATA_DIR).join(SEED_FILENAME)
    }
}

/// Default private key used for seed decryption and commit signing.
pub fn default_private_key_path() -> PathBuf {
    PathBuf::from("keys").join("student_private.pem")
}

/// Default public key of the attestation recipient.
pub fn default_recipient_key_path() -> PathBuf {
    PathBuf::from("keys").join("instructor_public.pem")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_container_dir_is_preferred() {
        let dir = std::env::temp_dir();
        assert_eq!(seed_path_under(&dir), dir.join("seed.txt"));
    }

    #[test]
    fn missing_container_dir_falls_back_to_local() {
        let dir = std::env::temp_dir().join("seedgate-paths-does-not-exist");
        assert_eq!(seed_path_under(&dir), PathBuf::from("data").join("seed.txt"));
    }

    #[test]
    fn default_key_paths_are_relative() {
        assert!(default_private_key_path().is_relative());
        assert!(default_recipient_key_path().ends_with("instructor_public.pem"));
    }
}
