//! HTTP transport
//!
//! One GET per call; no retries, caching or rate limiting.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::CtaConfig;
use crate::error::TransportError;

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Performs a single GET and hands back the raw response
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a GET request to `url`
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
    connect_timeout_secs: u64,
}

impl ReqwestTransport {
    /// Create a transport with the configured timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &CtaConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cta-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
            connect_timeout_secs: config.connect_timeout_secs,
        })
    }

    fn map_error(&self, e: &reqwest::Error) -> TransportError {
        self.classify(e.is_connect(), e.is_timeout(), e.to_string())
    }

    /// A connect error that is also a timeout hit the connect timeout,
    /// not the whole-request one.
    fn classify(&self, connecting: bool, timed_out: bool, detail: String) -> TransportError {
        match (connecting, timed_out) {
            (true, true) => TransportError::ConnectionFailed(format!(
                "connection not established within {} seconds: {detail}",
                self.connect_timeout_secs
            )),
            (true, false) => TransportError::ConnectionFailed(detail),
            (false, true) => TransportError::Timeout {
                timeout_secs: self.timeout_secs,
            },
            (false, false) => TransportError::RequestFailed(detail),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_error(&e))?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(HttpResponse { status, body })
    }
}
