//! The notes service as seen by the key protocol.
//!
//! `EnvelopeManager` talks to the backend only through `CryptoBackend`, so
//! the HTTP client and the in-process store are interchangeable.

use crate::error::{ClientError, ClientResult};
use crate::types::CryptoConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Source of the per-user crypto config and sink for a newly wrapped DEK.
#[async_trait]
pub trait CryptoBackend: Send + Sync {
    /// Fetches the current salt and wrapped DEK.
    async fn fetch_config(&self) -> ClientResult<CryptoConfig>;

    /// Durably stores a wrapped DEK (`nonce || sealed`).
    ///
    /// Implementations report every failure as `PersistWrappedDek`.
    async fn store_wrapped_dek(&self, wrapped_dek: &[u8]) -> ClientResult<()>;
}

/// In-process backend holding a single user's config.
pub struct MemoryBackend {
    config: RwLock<CryptoConfig>,
    store_calls: AtomicUsize,
    fail_stores: AtomicBool,
    session_active: AtomicBool,
}

impl MemoryBackend {
    pub fn new(salt: Vec<u8>) -> Self {
        Self::with_config(CryptoConfig::new(salt))
    }

    pub fn with_config(config: CryptoConfig) -> Self {
        Self {
            config: RwLock::new(config),
            store_calls: AtomicUsize::new(0),
            fail_stores: AtomicBool::new(false),
            session_active: AtomicBool::new(true),
        }
    }

    /// Returns a copy of what is currently persisted.
    pub async fn snapshot(&self) -> CryptoConfig {
        self.config.read().await.clone()
    }

    /// Number of successful `store_wrapped_dek` calls.
    pub fn store_count(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    /// Makes subsequent stores fail until reset.
    pub fn set_store_failure(&self, fail: bool) {
        self.fail_stores.store(fail, Ordering::SeqCst);
    }

    /// Simulates session expiry: fetches fail with `NoActiveSession`.
    pub fn set_session_active(&self, active: bool) {
        self.session_active.store(active, Ordering::SeqCst);
    }

    /// Removes the stored wrapped DEK, leaving the salt.
    pub async fn clear_wrapped_dek(&self) {
        self.config.write().await.wrapped_dek = None;
    }
}

#[async_trait]
impl CryptoBackend for MemoryBackend {
    async fn fetch_config(&self) -> ClientResult<CryptoConfig> {
        if !self.session_active.load(Ordering::SeqCst) {
            return Err(ClientError::NoActiveSession);
        }
        Ok(self.config.read().await.clone())
    }

    async fn store_wrapped_dek(&self, wrapped_dek: &[u8]) -> ClientResult<()> {
        if self.fail_stores.load(Ordering::SeqCst) {
            return Err(ClientError::PersistWrappedDek(
                "memory backend configured to fail".to_string(),
            ));
        }

        self.config.write().await.wrapped_dek = Some(wrapped_dek.to_vec());
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        debug!("stored wrapped DEK ({} bytes)", wrapped_dek.len());
        Ok(())
    }
}
