//! Unlock orchestration and ownership of the session DEK.
//!
//! `EnvelopeManager` derives the KEK from the user's password, then either
//! unwraps the stored DEK or, on first use, generates a DEK, wraps it and
//! persists the envelope before treating it as active. It is the only
//! writer of the DEK; `NoteCipher` gets read access per call.

use crate::backend::CryptoBackend;
use crate::config::{ClientConfig, UnlockContention};
use crate::error::{ClientError, ClientResult};
use crate::types::CryptoConfig;
use notecrypt_crypto::{DataKey, KeyDeriver, KeyEncryptionKey, KeyEnvelope};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Lock state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocking,
    Unlocked,
}

struct Session {
    state: LockState,
    dek: Option<DataKey>,
    /// Last config seen, including an envelope this manager persisted.
    config: Option<CryptoConfig>,
}

/// Owns the unlock state machine and the in-memory DEK.
pub struct EnvelopeManager {
    backend: Arc<dyn CryptoBackend>,
    deriver: KeyDeriver,
    contention: UnlockContention,
    session: RwLock<Session>,
    /// Serializes unlocks. Two concurrent generate paths would each persist
    /// a different DEK and leave one caller holding a key that no longer
    /// matches the stored envelope.
    unlock_lock: Mutex<()>,
}

impl EnvelopeManager {
    pub fn new(backend: Arc<dyn CryptoBackend>, config: &ClientConfig) -> Self {
        Self {
            backend,
            deriver: KeyDeriver::new(config.kdf_params()),
            contention: config.unlock_contention,
            session: RwLock::new(Session {
                state: LockState::Locked,
                dek: None,
                config: None,
            }),
            unlock_lock: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> LockState {
        self.session.read().await.state
    }

    /// True iff the state is `Unlocked` and a DEK is held.
    pub async fn is_unlocked(&self) -> bool {
        let session = self.session.read().await;
        session.state == LockState::Unlocked && session.dek.is_some()
    }

    /// The config from the last unlock attempt, with any envelope persisted since.
    pub async fn cached_config(&self) -> Option<CryptoConfig> {
        self.session.read().await.config.clone()
    }

    /// Unlocks with `password`.
    ///
    /// Any DEK from a previous unlock is dropped first; on failure the
    /// manager ends `Locked` with no DEK.
    pub async fn unlock(&self, password: &str) -> ClientResult<()> {
        let _guard = match self.contention {
            UnlockContention::Wait => self.unlock_lock.lock().await,
            UnlockContention::Reject => self.unlock_lock.try_lock().map_err(|_| {
                debug!("rejecting concurrent unlock");
                ClientError::UnlockAlreadyInProgress
            })?,
        };

        {
            let mut session = self.session.write().await;
            session.state = LockState::Unlocking;
            session.dek = None;
        }
        let mut reset = ResetOnDrop::new(&self.session);

        let result = self.run_unlock(password).await;

        let mut session = self.session.write().await;
        reset.disarm();
        match result {
            Ok((dek, config)) => {
                session.dek = Some(dek);
                session.config = Some(config);
                session.state = LockState::Unlocked;
                info!("encryption unlocked");
                Ok(())
            }
            Err(e) => {
                session.dek = None;
                session.state = LockState::Locked;
                warn!(error = %e, "unlock failed");
                Err(e)
            }
        }
    }

    /// Ends the session: drops (and thereby zeroizes) the DEK.
    pub async fn lock(&self) {
        let _guard = self.unlock_lock.lock().await;
        let mut session = self.session.write().await;
        session.dek = None;
        session.state = LockState::Locked;
        debug!("encryption locked");
    }

    /// Runs `f` against the DEK if unlocked.
    pub(crate) async fn with_dek<R>(&self, f: impl FnOnce(&DataKey) -> R) -> Option<R> {
        let session = self.session.read().await;
        match (session.state, session.dek.as_ref()) {
            (LockState::Unlocked, Some(dek)) => Some(f(dek)),
            _ => None,
        }
    }

    async fn run_unlock(&self, password: &str) -> ClientResult<(DataKey, CryptoConfig)> {
        let (config, restored) = self.resolve_config().await?;
        let kek = self.derive_kek(password, &config.salt).await?;

        match config.wrapped_dek.as_deref() {
            Some(wrapped) => {
                let envelope = KeyEnvelope::from_bytes(wrapped)
                    .map_err(|_| ClientError::WrongPasswordOrCorruptData)?;
                let dek = kek
                    .unwrap(&envelope)
                    .map_err(|_| ClientError::WrongPasswordOrCorruptData)?;
                if restored {
                    self.persist_envelope(wrapped).await?;
                    info!("restored wrapped DEK on the backend");
                } else {
                    debug!("unwrapped existing DEK");
                }
                Ok((dek, config))
            }
            None => self.issue_dek(&kek, config).await,
        }
    }

    /// Fetches the config, falling back to the envelope this manager last
    /// held if the backend reports none for the same salt.
    ///
    /// The flag is true when the fallback was taken; the envelope must then
    /// be written back before its DEK may become active.
    async fn resolve_config(&self) -> ClientResult<(CryptoConfig, bool)> {
        let mut fetched = self.backend.fetch_config().await?;

        if fetched.wrapped_dek.is_none() {
            let session = self.session.read().await;
            if let Some(cached) = session.config.as_ref() {
                if cached.salt == fetched.salt && cached.wrapped_dek.is_some() {
                    warn!("backend returned no wrapped DEK; restoring the cached envelope");
                    fetched.wrapped_dek = cached.wrapped_dek.clone();
                    return Ok((fetched, true));
                }
            }
        }

        Ok((fetched, false))
    }

    async fn persist_envelope(&self, wrapped: &[u8]) -> ClientResult<()> {
        self.backend
            .store_wrapped_dek(wrapped)
            .await
            .map_err(|e| match e {
                ClientError::PersistWrappedDek(_) => e,
                other => ClientError::PersistWrappedDek(other.to_string()),
            })
    }

    async fn derive_kek(&self, password: &str, salt: &[u8]) -> ClientResult<KeyEncryptionKey> {
        let deriver = self.deriver;
        let password = Zeroizing::new(password.to_owned());
        let salt = salt.to_vec();

        tokio::task::spawn_blocking(move || deriver.derive(&password, &salt))
            .await
            .map_err(|e| ClientError::DerivationFailed(e.to_string()))?
            .map_err(|e| ClientError::DerivationFailed(e.to_string()))
    }

    /// Generates a DEK, wraps it and persists the envelope.
    ///
    /// The DEK is returned only after the backend confirms the store; on
    /// failure it is dropped and never becomes active.
    async fn issue_dek(
        &self,
        kek: &KeyEncryptionKey,
        config: CryptoConfig,
    ) -> ClientResult<(DataKey, CryptoConfig)> {
        let dek = DataKey::generate().map_err(|e| ClientError::Encryption(e.to_string()))?;
        let envelope = kek
            .wrap(&dek)
            .map_err(|e| ClientError::Encryption(e.to_string()))?;
        let wrapped = envelope.to_bytes();

        self.persist_envelope(&wrapped).await?;

        info!("generated and persisted new DEK");
        Ok((
            dek,
            CryptoConfig {
                salt: config.salt,
                wrapped_dek: Some(wrapped),
            },
        ))
    }
}

/// Returns the session to `Locked` if an `unlock` future is dropped while
/// `Unlocking`.
struct ResetOnDrop<'a> {
    session: &'a RwLock<Session>,
    armed: bool,
}

impl<'a> ResetOnDrop<'a> {
    fn new(session: &'a RwLock<Session>) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // The unlock mutex is still held here, so no other writer exists.
        // A concurrent reader makes this a no-op; the next unlock or lock()
        // resets the state then.
        if let Ok(mut session) = self.session.try_write() {
            if session.state == LockState::Unlocking {
                session.state = LockState::Locked;
                session.dek = None;
            }
            debug!("unlock cancelled");
        }
    }
}
