//! Cryptographic building blocks for notecrypt.
//!
//! Provides the primitives the envelope protocol composes:
//! - PBKDF2-HMAC-SHA256 for deriving a key-encryption key from a password
//! - AES-256-GCM for authenticated encryption
//! - Key types that zeroize on drop
//!
//! # Architecture
//!
//! The encryption uses a two-tier key system:
//!
//! 1. **Key-encryption key (KEK)**: Derived from the user's password and a
//!    per-user salt. It is never stored and can only wrap or unwrap a DEK.
//!
//! 2. **Data-encryption key (DEK)**: 32 random bytes generated once per user.
//!    The DEK is wrapped under the KEK and the wrapped form is stored
//!    server-side; the DEK itself encrypts note content.
//!
//! Every sealed value travels as `nonce (12 bytes) || ciphertext || tag (16 bytes)`,
//! standard base64 encoded.

mod cipher;
mod error;
pub mod kdf;
mod keys;
mod sealed;

pub use cipher::{open, random_bytes, seal, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_kek, KdfParams, KeyDeriver, PBKDF2_ITERATIONS};
pub use keys::{DataKey, KeyEncryptionKey};
pub use sealed::{KeyEnvelope, NotePayload, SealedBox};
