//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by unlock, encrypt and the backend collaborator.
///
/// Decryption never produces one of these; see `NoteCipher::decrypt`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to fetch crypto config: {0}")]
    ConfigFetch(String),

    /// The config fetch was refused with 401. A config-fetch failure kept
    /// separate so callers can prompt for login; see `is_config_fetch`.
    #[error("no active session")]
    NoActiveSession,

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("wrong password or corrupt key data")]
    WrongPasswordOrCorruptData,

    #[error("failed to persist wrapped DEK: {0}")]
    PersistWrappedDek(String),

    #[error("unlock already in progress")]
    UnlockAlreadyInProgress,

    #[error("encryption not unlocked")]
    EncryptionNotReady,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// True for every failure to obtain the crypto config, including a
    /// missing session.
    pub fn is_config_fetch(&self) -> bool {
        matches!(self, Self::ConfigFetch(_) | Self::NoActiveSession)
    }
}
