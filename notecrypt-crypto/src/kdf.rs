//! Password-based derivation of the key-encryption key.
//!
//! PBKDF2 with HMAC-SHA256 as the PRF and a 256-bit output. The output is
//! used as an AES-256-GCM key for DEK wrapping and nothing else.

use crate::cipher::KEY_SIZE;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::KeyEncryptionKey;
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

/// Iteration count used by every deployed client.
pub const PBKDF2_ITERATIONS: u32 = 200_000;

/// Tunable KDF parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

fn derive_bytes(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
) -> CryptoResult<Zeroizing<[u8; KEY_SIZE]>> {
    if salt.is_empty() {
        return Err(CryptoError::KeyDerivation("salt must not be empty".to_string()));
    }
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be positive".to_string(),
        ));
    }

    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, params.iterations, &mut out[..]);
    Ok(out)
}

/// Derives a KEK from a password and salt.
///
/// Deterministic for a fixed `(password, salt, params)`. An empty password
/// is accepted; an empty salt is rejected.
pub fn derive_kek(password: &str, salt: &[u8], params: &KdfParams) -> CryptoResult<KeyEncryptionKey> {
    let bytes = derive_bytes(password, salt, params)?;
    Ok(KeyEncryptionKey::from_bytes(*bytes))
}

/// Stateless deriver bound to one parameter set.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyDeriver {
    params: KdfParams,
}

impl KeyDeriver {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    pub fn derive(&self, password: &str, salt: &[u8]) -> CryptoResult<KeyEncryptionKey> {
        derive_kek(password, salt, &self.params)
    }
}
