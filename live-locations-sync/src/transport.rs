//! Transport seam used by the sync client.

use async_trait::async_trait;
use thiserror::Error;

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as UTF-8.
    pub body: String,
}

impl TransportResponse {
    /// Construct a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// Failures that prevented an exchange from completing.
///
/// A response with an error status is not a transport error; it arrives as a
/// [`TransportResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// Connection, DNS or protocol failure.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Transport diagnostic.
        message: String,
    },
    /// The response body could not be read.
    #[error("failed to read response body from {url}: {message}")]
    Body {
        /// Fully qualified request URL.
        url: String,
        /// Transport diagnostic.
        message: String,
    },
}

/// Performs the two exchanges the feature store needs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST` an XML document to `url`.
    async fn post_xml(&self, url: &str, body: String) -> Result<TransportResponse, TransportError>;

    /// `GET` `url`.
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}
