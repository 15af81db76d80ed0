//! Client configuration.

use crate::error::{ClientError, ClientResult};
use notecrypt_crypto::{KdfParams, PBKDF2_ITERATIONS};
use serde::{Deserialize, Serialize};

/// What a second `unlock` does while another one is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockContention {
    /// Queue behind the running unlock, then unlock against the settled config.
    #[default]
    Wait,
    /// Fail immediately with `UnlockAlreadyInProgress`.
    Reject,
}

impl std::str::FromStr for UnlockContention {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wait" => Ok(Self::Wait),
            "reject" => Ok(Self::Reject),
            other => Err(ClientError::Config(format!(
                "unknown unlock contention mode: {other}"
            ))),
        }
    }
}

/// Configuration for the notes crypto client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the notes API (e.g., "https://example.org/notes/api").
    pub api_base_url: String,

    /// Name of the session cookie the API authenticates with.
    pub session_cookie_name: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// PBKDF2 iteration count for KEK derivation.
    pub kdf_iterations: u32,

    pub unlock_contention: UnlockContention,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/notes/api".to_string(),
            session_cookie_name: "notes_key".to_string(),
            request_timeout_secs: 30,
            kdf_iterations: PBKDF2_ITERATIONS,
            unlock_contention: UnlockContention::Wait,
        }
    }
}

impl ClientConfig {
    /// Builds a config from defaults overridden by `NOTECRYPT_*` env vars.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("NOTECRYPT_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Ok(name) = std::env::var("NOTECRYPT_COOKIE_NAME") {
            config.session_cookie_name = name;
        }
        if let Ok(secs) = std::env::var("NOTECRYPT_TIMEOUT_SECS") {
            config.request_timeout_secs = secs.parse().map_err(|e| {
                ClientError::Config(format!("NOTECRYPT_TIMEOUT_SECS: {e}"))
            })?;
        }
        if let Ok(iterations) = std::env::var("NOTECRYPT_KDF_ITERATIONS") {
            config.kdf_iterations = iterations.parse().map_err(|e| {
                ClientError::Config(format!("NOTECRYPT_KDF_ITERATIONS: {e}"))
            })?;
        }
        if let Ok(mode) = std::env::var("NOTECRYPT_UNLOCK_CONTENTION") {
            config.unlock_contention = mode.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ClientError::Config("missing api_base_url".to_string()));
        }
        if self.session_cookie_name.trim().is_empty() {
            return Err(ClientError::Config("missing session_cookie_name".to_string()));
        }
        if self.kdf_iterations == 0 {
            return Err(ClientError::Config("kdf_iterations must be positive".to_string()));
        }
        Ok(())
    }

    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
        }
    }

    /// Joins an endpoint path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }
}
