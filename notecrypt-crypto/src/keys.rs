//! Key types for the two-tier hierarchy.
//!
//! `KeyEncryptionKey` can only wrap and unwrap a `DataKey`; it has no API
//! for sealing arbitrary data. Both types zeroize their bytes on drop.

use crate::cipher::{self, KEY_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::sealed::{KeyEnvelope, SealedBox};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A 256-bit data-encryption key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DataKey {
    bytes: [u8; KEY_SIZE],
}

impl DataKey {
    /// Generates a new key from the OS CSPRNG.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self {
            bytes: cipher::random_bytes::<KEY_SIZE>()?,
        })
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Raw key bytes. Do not store or log.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    pub fn seal(&self, plaintext: &[u8]) -> CryptoResult<SealedBox> {
        cipher::seal(&self.bytes, plaintext)
    }

    pub fn open(&self, sealed: &SealedBox) -> CryptoResult<Vec<u8>> {
        cipher::open(&self.bytes, sealed)
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataKey").field("bytes", &"[REDACTED]").finish()
    }
}

/// A key derived from the user's password, used only for DEK wrapping.
#[derive(ZeroizeOnDrop)]
pub struct KeyEncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl KeyEncryptionKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Seals a DEK under this KEK with a fresh random nonce.
    pub fn wrap(&self, dek: &DataKey) -> CryptoResult<KeyEnvelope> {
        cipher::seal(&self.bytes, dek.as_bytes())
    }

    /// Opens a wrapped DEK.
    ///
    /// Authentication failure means the password was wrong or the envelope
    /// was altered; the two cases are indistinguishable by construction.
    pub fn unwrap(&self, envelope: &KeyEnvelope) -> CryptoResult<DataKey> {
        let plaintext = Zeroizing::new(cipher::open(&self.bytes, envelope)?);
        DataKey::from_slice(&plaintext)
    }
}

impl std::fmt::Debug for KeyEncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
