//! Shared helpers for notecrypt-client integration tests.

#![allow(dead_code)]

use notecrypt_client::{
    ClientConfig, CryptoBackend, EnvelopeManager, MemoryBackend, NoteCipher, UnlockContention,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Config with a low iteration count so tests stay fast in debug builds.
pub fn fast_config(api_base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: api_base_url.to_string(),
        kdf_iterations: 1_000,
        ..ClientConfig::default()
    }
}

pub fn fast_config_with(contention: UnlockContention) -> ClientConfig {
    ClientConfig {
        unlock_contention: contention,
        ..fast_config("http://unused.invalid")
    }
}

pub fn manager(backend: Arc<dyn CryptoBackend>, config: &ClientConfig) -> Arc<EnvelopeManager> {
    Arc::new(EnvelopeManager::new(backend, config))
}

/// Fresh in-memory backend with a 16-byte salt.
pub fn memory_backend(salt_byte: u8) -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new(vec![salt_byte; 16]))
}

/// Unlocked manager plus cipher over a fresh in-memory backend.
pub async fn unlocked_cipher(password: &str) -> (Arc<MemoryBackend>, Arc<EnvelopeManager>, NoteCipher) {
    let backend = memory_backend(0x42);
    let keys = manager(backend.clone(), &fast_config_with(UnlockContention::Wait));
    keys.unlock(password).await.expect("unlock must succeed");
    let cipher = NoteCipher::new(keys.clone());
    (backend, keys, cipher)
}
