//! Seed persistence.
//!
//! The store is an untrusted boundary: it writes and returns trimmed text
//! but never validates it. Callers re-validate every loaded seed.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("seed not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            // An unreadable seed is as unavailable as a missing one.
            StoreError::NotFound(_) | StoreError::Io(_) => ErrorKind::NotFound,
        }
    }
}

/// Key-value contract for the provisioned seed.
pub trait SeedStore: Send + Sync {
    /// Persist the seed, replacing any previous one.
    fn store(&self, seed_hex: &str) -> Result<(), StoreError>;

    /// Load the seed text exactly as stored (trimmed).
    fn load(&self) -> Result<String, StoreError>;
}

/// Seed stored as a single text file.
#[derive(Debug, Clone)]
pub struct FileSeedStore {
    path: PathBuf,
}

impl FileSeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeedStore for FileSeedStore {
    fn store(&self, seed_hex: &str) -> Result<(), StoreError> {
        write_text_private(&self.path, seed_hex.trim())?;
        tracing::debug!(path = %self.path.display(), "Seed saved");
        Ok(())
    }

    fn load(&self) -> Result<String, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.path.clone()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

/// Write text atomically (temp file + rename), creating parent directories,
/// then restrict the file to its owner where the platform allows it.
pub fn write_text_private(path: &Path, text: &str) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, text)?;
    restrict_permissions(&tmp);
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), error = %e, "Could not restrict seed permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
