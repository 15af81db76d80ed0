//! Transport form of AEAD output.
//!
//! Both the wrapped DEK and every note payload use the same layout:
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`, standard base64
//! encoded when it crosses the wire.

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A nonce plus the AEAD output (ciphertext with its authentication tag).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedBox {
    /// Random 96-bit nonce used for exactly one seal.
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext followed by the 16-byte tag.
    pub sealed: Vec<u8>,
}

/// The DEK sealed under the KEK. Produced once per DEK generation.
pub type KeyEnvelope = SealedBox;

/// A single note sealed under the DEK.
pub type NotePayload = SealedBox;

impl SealedBox {
    /// Smallest valid wire length: a nonce and a tag over empty plaintext.
    pub const MIN_LEN: usize = NONCE_SIZE + TAG_SIZE;

    /// Length of the concatenated wire form.
    pub fn wire_len(&self) -> usize {
        NONCE_SIZE + self.sealed.len()
    }

    /// Concatenates `nonce || sealed`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.sealed);
        out
    }

    /// Splits a concatenated `nonce || sealed` blob.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < Self::MIN_LEN {
            return Err(CryptoError::Encoding(format!(
                "sealed data too short: {} bytes, need at least {}",
                bytes.len(),
                Self::MIN_LEN
            )));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);
        Ok(Self {
            nonce,
            sealed: bytes[NONCE_SIZE..].to_vec(),
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = decode_b64(encoded)?;
        Self::from_bytes(&bytes)
    }

    /// Base64 of the nonce alone (split-field transport).
    pub fn nonce_base64(&self) -> String {
        STANDARD.encode(self.nonce)
    }

    /// Base64 of the ciphertext and tag alone (split-field transport).
    pub fn sealed_base64(&self) -> String {
        STANDARD.encode(&self.sealed)
    }

    /// Rebuilds a box from separately encoded nonce and ciphertext fields.
    pub fn from_parts_base64(nonce_b64: &str, sealed_b64: &str) -> CryptoResult<Self> {
        let nonce_bytes = decode_b64(nonce_b64)?;
        if nonce_bytes.len() != NONCE_SIZE {
            return Err(CryptoError::Encoding(format!(
                "nonce must be {NONCE_SIZE} bytes, got {}",
                nonce_bytes.len()
            )));
        }

        let sealed = decode_b64(sealed_b64)?;
        if sealed.len() < TAG_SIZE {
            return Err(CryptoError::Encoding(format!(
                "ciphertext shorter than the {TAG_SIZE}-byte tag"
            )));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&nonce_bytes);
        Ok(Self { nonce, sealed })
    }
}

fn decode_b64(encoded: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CryptoError::Encoding(format!("invalid base64: {e}")))
}
