//! Client-side envelope key management for the notes service.
//!
//! Provides:
//! - Fetching the per-user crypto configuration (salt, wrapped DEK)
//! - Unlocking: derive the KEK, then unwrap the DEK or generate and persist one
//! - Per-note authenticated encryption with fail-soft decryption
//! - A most-recently-used list of selected items
//!
//! Unlock and encrypt are strict and return `ClientError`; decrypt never
//! fails and resolves every problem to a readable placeholder so a single
//! bad note cannot block rendering a list.

pub mod api_client;
pub mod backend;
pub mod config;
pub mod envelope;
pub mod error;
pub mod note_cipher;
pub mod recent;
pub mod types;

pub use api_client::CryptoApiClient;
pub use backend::{CryptoBackend, MemoryBackend};
pub use config::{ClientConfig, UnlockContention};
pub use envelope::{EnvelopeManager, LockState};
pub use error::{ClientError, ClientResult};
pub use note_cipher::NoteCipher;
pub use recent::{RecentItem, RecentItems};
pub use types::*;
