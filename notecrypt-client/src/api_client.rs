//! HTTP client for the notes service crypto endpoints.
//!
//! Authenticates with the session cookie the service issues at login and
//! implements `CryptoBackend` over `GET /crypto/config` and
//! `POST /crypto/dek`.

use crate::backend::CryptoBackend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{CryptoConfig, CryptoConfigResponse, DekUpdateRequest};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// HTTP client for the notes service.
pub struct CryptoApiClient {
    client: Client,
    config: ClientConfig,
    /// Value of the session cookie, if a session has been established.
    session_key: Arc<RwLock<Option<String>>>,
}

impl CryptoApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            session_key: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sets the session key (the cookie value issued by the service).
    pub async fn set_session_key(&self, key: String) {
        *self.session_key.write().await = Some(key);
    }

    pub async fn clear_session(&self) {
        *self.session_key.write().await = None;
    }

    pub async fn has_session(&self) -> bool {
        self.session_key.read().await.is_some()
    }

    async fn with_session(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session_key.read().await.as_deref() {
            Some(key) => builder.header(
                COOKIE,
                format!("{}={}", self.config.session_cookie_name, key),
            ),
            None => builder,
        }
    }

    /// Fetches the salt and wrapped DEK.
    ///
    /// A 401 means there is no active session and maps to
    /// `NoActiveSession`; anything else that goes wrong is `ConfigFetch`.
    pub async fn get_crypto_config(&self) -> ClientResult<CryptoConfig> {
        let url = self.config.endpoint("/crypto/config");
        let resp = self
            .with_session(self.client.get(&url))
            .await
            .send()
            .await
            .map_err(|e| ClientError::ConfigFetch(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            debug!("401 on GET /crypto/config");
            return Err(ClientError::NoActiveSession);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ConfigFetch(format!("{status}: {body}")));
        }

        let data: CryptoConfigResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::ConfigFetch(format!("invalid response body: {e}")))?;

        CryptoConfig::from_response(&data)
    }

    /// Stores a newly wrapped DEK. Any non-success status is a persist failure.
    pub async fn post_wrapped_dek(&self, wrapped_dek: &[u8]) -> ClientResult<()> {
        let url = self.config.endpoint("/crypto/dek");
        let body = DekUpdateRequest::from_wrapped(wrapped_dek);

        let resp = self
            .with_session(self.client.post(&url).json(&body))
            .await
            .send()
            .await
            .map_err(|e| ClientError::PersistWrappedDek(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ClientError::PersistWrappedDek(format!("{status}: {text}")));
        }

        debug!("persisted wrapped DEK");
        Ok(())
    }
}

#[async_trait]
impl CryptoBackend for CryptoApiClient {
    async fn fetch_config(&self) -> ClientResult<CryptoConfig> {
        self.get_crypto_config().await
    }

    async fn store_wrapped_dek(&self, wrapped_dek: &[u8]) -> ClientResult<()> {
        self.post_wrapped_dek(wrapped_dek).await
    }
}
