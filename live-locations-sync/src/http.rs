//! HTTP transport backed by `reqwest`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use live_locations_sync::{HttpTransport, HttpTransportConfig, SyncClient};
//!
//! let config = HttpTransportConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-tracker/1.0");
//! let client = SyncClient::new(HttpTransport::with_config(config)?);
//! # Ok::<(), live_locations_sync::TransportBuildError>(())
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::transport::{Transport, TransportError, TransportResponse};

/// Default user agent for store requests.
pub const DEFAULT_USER_AGENT: &str = "live-locations/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Content type of transaction documents.
const XML_CONTENT_TYPE: &str = "application/xml";

/// Error returned when the HTTP client cannot be built.
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct TransportBuildError(#[from] reqwest::Error);

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Request timeout, applied to connecting and to the whole exchange.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTransportConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`Transport`] issuing real HTTP requests.
///
/// The underlying client pools connections; nothing else is shared between
/// requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, TransportBuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    async fn complete(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<TransportResponse, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| TransportError::Body {
            url: url.to_owned(),
            message: err.to_string(),
        })?;
        Ok(TransportResponse { status, body })
    }

    /// Convert a reqwest error to a `TransportError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_xml(&self, url: &str, body: String) -> Result<TransportResponse, TransportError> {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);
        self.complete(url, request).await
    }

    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.complete(url, self.client.get(url)).await
    }
}
