//! AES-256-GCM sealing with per-call random nonces.

use crate::error::{CryptoError, CryptoResult};
use crate::sealed::SealedBox;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Symmetric key size in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// AES-GCM nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Fills an array from the operating system's CSPRNG.
pub fn random_bytes<const N: usize>() -> CryptoResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Random(e.to_string()))?;
    Ok(bytes)
}

fn cipher_for(key: &[u8; KEY_SIZE]) -> CryptoResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
        expected: KEY_SIZE,
        actual: key.len(),
    })
}

/// Encrypts `plaintext` under `key` with a freshly drawn random nonce.
///
/// The nonce is never derived from a counter or reused; each call draws
/// 96 bits from the OS generator.
pub fn seal(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> CryptoResult<SealedBox> {
    let cipher = cipher_for(key)?;
    let nonce = random_bytes::<NONCE_SIZE>()?;

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(format!("seal failed: {e}")))?;

    Ok(SealedBox { nonce, sealed })
}

/// Decrypts and authenticates a sealed box.
///
/// Fails closed: a wrong key, a modified nonce or any tampered byte of
/// the ciphertext or tag yields `CryptoError::Decryption`.
pub fn open(key: &[u8; KEY_SIZE], sealed: &SealedBox) -> CryptoResult<Vec<u8>> {
    let cipher = cipher_for(key)?;

    cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.sealed.as_ref())
        .map_err(|_| {
            CryptoError::Decryption("authentication failed (wrong key or tampered data)".to_string())
        })
}
