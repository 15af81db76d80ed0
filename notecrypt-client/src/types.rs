//! Shared types for the notes crypto protocol.

use crate::error::{ClientError, ClientResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use notecrypt_crypto::NotePayload;
use serde::{Deserialize, Serialize};

/// Note format version written by this client.
pub const ENCRYPTION_VERSION: u32 = 1;

fn default_encryption_version() -> u32 {
    ENCRYPTION_VERSION
}

/// Per-user crypto configuration as held by the client.
///
/// `wrapped_dek` is either absent (no DEK issued yet) or the raw
/// `nonce || sealed` bytes of the DEK wrapped under the user's KEK.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CryptoConfig {
    pub salt: Vec<u8>,
    pub wrapped_dek: Option<Vec<u8>>,
}

impl CryptoConfig {
    pub fn new(salt: Vec<u8>) -> Self {
        Self {
            salt,
            wrapped_dek: None,
        }
    }

    pub fn has_wrapped_dek(&self) -> bool {
        self.wrapped_dek.is_some()
    }

    /// Decodes the `GET /crypto/config` body.
    ///
    /// An empty `dek_for_user_b64` is treated the same as `null`.
    pub fn from_response(resp: &CryptoConfigResponse) -> ClientResult<Self> {
        let salt = STANDARD
            .decode(resp.crypto_salt_b64.trim())
            .map_err(|e| ClientError::ConfigFetch(format!("invalid crypto_salt_b64: {e}")))?;

        let wrapped_dek = match resp.dek_for_user_b64.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(encoded) => Some(STANDARD.decode(encoded).map_err(|e| {
                ClientError::ConfigFetch(format!("invalid dek_for_user_b64: {e}"))
            })?),
        };

        Ok(Self { salt, wrapped_dek })
    }

    pub fn to_response(&self) -> CryptoConfigResponse {
        CryptoConfigResponse {
            crypto_salt_b64: STANDARD.encode(&self.salt),
            dek_for_user_b64: self.wrapped_dek.as_ref().map(|w| STANDARD.encode(w)),
        }
    }
}

/// Body of `GET /crypto/config`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoConfigResponse {
    pub crypto_salt_b64: String,
    #[serde(default)]
    pub dek_for_user_b64: Option<String>,
}

/// Body of `POST /crypto/dek`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DekUpdateRequest {
    pub dek_for_user_b64: String,
}

impl DekUpdateRequest {
    pub fn from_wrapped(wrapped_dek: &[u8]) -> Self {
        Self {
            dek_for_user_b64: STANDARD.encode(wrapped_dek),
        }
    }
}

/// Encrypted note content as stored by the notes service.
///
/// Either text field may be missing for notes written before encryption
/// existed. `encryption_version` is carried through unmodified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedNote {
    #[serde(default)]
    pub ciphertext_b64: Option<String>,
    #[serde(default)]
    pub nonce_b64: Option<String>,
    #[serde(default = "default_encryption_version")]
    pub encryption_version: u32,
}

impl EncryptedNote {
    /// Note with neither nonce nor ciphertext.
    pub fn empty() -> Self {
        Self {
            ciphertext_b64: None,
            nonce_b64: None,
            encryption_version: ENCRYPTION_VERSION,
        }
    }

    pub fn from_payload(payload: &NotePayload) -> Self {
        Self {
            ciphertext_b64: Some(payload.sealed_base64()),
            nonce_b64: Some(payload.nonce_base64()),
            encryption_version: ENCRYPTION_VERSION,
        }
    }

    /// Nonce and ciphertext, if both are present and non-empty.
    pub fn parts(&self) -> Option<(&str, &str)> {
        let nonce = self.nonce_b64.as_deref().filter(|s| !s.is_empty())?;
        let ciphertext = self.ciphertext_b64.as_deref().filter(|s| !s.is_empty())?;
        Some((nonce, ciphertext))
    }
}

/// A note row as returned by `GET /notes/{student_id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: i64,
    pub owner: i64,
    pub student: i64,
    #[serde(flatten)]
    pub content: EncryptedNote,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated: Option<NaiveDateTime>,
}

/// Body of `POST /notes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNoteRequest {
    pub student_id: i64,
    #[serde(flatten)]
    pub content: EncryptedNote,
}
