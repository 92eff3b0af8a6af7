//! Shared adapter state.

use std::path::PathBuf;
use std::sync::Arc;

use seedgate_common::persist::SeedStore;
use seedgate_crypto::keys::load_private_key;
use seedgate_crypto::{CryptoError, PrivateKey, TotpEngine};

/// Process-wide cache of the decryption key.
///
/// A failed load leaves the cache empty, so the next request reloads from
/// disk. The key is never mutated once cached.
pub struct KeyCache {
    path: PathBuf,
    cached: tokio::sync::Mutex<Option<Arc<PrivateKey>>>,
}

impl KeyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: tokio::sync::Mutex::new(None),
        }
    }

    /// Return the cached key, loading it first if needed.
    pub async fn get(&self) -> Result<Arc<PrivateKey>, CryptoError> {
        let mut guard = self.cached.lock().await;
        if let Some(key) = guard.as_ref() {
            return Ok(key.clone());
        }

        let key = Arc::new(load_private_key(&self.path)?);
        *guard = Some(key.clone());
        Ok(key)
    }

    /// Try to load at startup. Not fatal: requests retry later.
    pub async fn warm(&self) {
        if let Err(e) = self.get().await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Private key not loaded at startup; will retry on demand"
            );
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.cached.lock().await.is_some()
    }
}

/// State shared by all HTTP handlers.
pub struct AppState {
    pub keys: KeyCache,
    pub store: Arc<dyn SeedStore>,
    pub totp: TotpEngine,
}

impl AppState {
    pub fn new(keys: KeyCache, store: Arc<dyn SeedStore>) -> Self {
        Self {
            keys,
            store,
            totp: TotpEngine::new(),
        }
    }
}
