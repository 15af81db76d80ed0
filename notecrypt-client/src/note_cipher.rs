//! Per-note encryption under the session DEK.
//!
//! `encrypt` is strict. `decrypt` is fail-soft: a missing field, a locked
//! session or a note that does not authenticate each resolve to a distinct
//! placeholder string so that rendering a list never stops at one bad note.

use crate::envelope::EnvelopeManager;
use crate::error::{ClientError, ClientResult};
use crate::types::EncryptedNote;
use notecrypt_crypto::NotePayload;
use std::sync::Arc;
use tracing::warn;

/// Shown for a note that has no nonce or no ciphertext.
pub const NO_DATA: &str = "[no data]";

/// Shown for any note while the session is locked.
pub const LOCKED: &str = "[locked: enter encryption password]";

/// Shown for a note whose encoding is malformed or that fails to authenticate.
pub const UNDECRYPTABLE: &str = "[could not decrypt]";

/// Encrypts and decrypts notes with the DEK held by an `EnvelopeManager`.
#[derive(Clone)]
pub struct NoteCipher {
    keys: Arc<EnvelopeManager>,
}

impl NoteCipher {
    pub fn new(keys: Arc<EnvelopeManager>) -> Self {
        Self { keys }
    }

    /// Seals the UTF-8 bytes of `plaintext` with a fresh random nonce.
    pub async fn encrypt(&self, plaintext: &str) -> ClientResult<NotePayload> {
        self.keys
            .with_dek(|dek| dek.seal(plaintext.as_bytes()))
            .await
            .ok_or(ClientError::EncryptionNotReady)?
            .map_err(|e| ClientError::Encryption(e.to_string()))
    }

    /// Like `encrypt`, returning the transport form at the current version.
    pub async fn encrypt_note(&self, plaintext: &str) -> ClientResult<EncryptedNote> {
        let payload = self.encrypt(plaintext).await?;
        Ok(EncryptedNote::from_payload(&payload))
    }

    /// Decrypts a note, never failing.
    pub async fn decrypt(&self, note: &EncryptedNote) -> String {
        let Some((nonce_b64, ciphertext_b64)) = note.parts() else {
            return NO_DATA.to_string();
        };

        if !self.keys.is_unlocked().await {
            return LOCKED.to_string();
        }

        let payload = match NotePayload::from_parts_base64(nonce_b64, ciphertext_b64) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "malformed note payload");
                return UNDECRYPTABLE.to_string();
            }
        };

        match self.keys.with_dek(|dek| dek.open(&payload)).await {
            None => LOCKED.to_string(),
            Some(Ok(bytes)) => String::from_utf8(bytes).unwrap_or_else(|e| {
                warn!(error = %e, "decrypted note is not valid UTF-8; decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }),
            Some(Err(e)) => {
                warn!(error = %e, "note decryption failed");
                UNDECRYPTABLE.to_string()
            }
        }
    }

    /// Decrypts each note independently, preserving order.
    pub async fn decrypt_all(&self, notes: &[EncryptedNote]) -> Vec<String> {
        let mut out = Vec::with_capacity(notes.len());
        for note in notes {
            out.push(self.decrypt(note).await);
        }
        out
    }
}
