//! Transports carrying encoded requests to the backend.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use thiserror::Error;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::{KontoError, Result};

/// A request that never produced a reply body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    /// What went wrong.
    pub message: String,
}

impl TransportError {
    /// Create a transport error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sends one encoded request and returns the raw reply body.
pub trait Transport: Send + Sync {
    /// Send a JSON request body.
    fn send(
        &self,
        body: Vec<u8>,
    ) -> impl Future<Output = std::result::Result<Bytes, TransportError>> + Send;
}

/// HTTP transport: `POST {url}{command_path}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl HttpTransport {
    /// Build a transport from the server settings.
    pub fn new(server: &ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()
            .map_err(|e| KontoError::ConfigError {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self::with_client(client, server))
    }

    /// Build a transport around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, server: &ServerConfig) -> Self {
        Self {
            client,
            endpoint: server.endpoint(),
            user_agent: server.user_agent.clone(),
        }
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>) -> std::result::Result<Bytes, TransportError> {
        debug!(endpoint = %self.endpoint, bytes = body.len(), "Posting command");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TransportError::new(format!("HTTP {}", response.status())));
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::new(format!("Reading reply failed: {e}")))
    }
}
