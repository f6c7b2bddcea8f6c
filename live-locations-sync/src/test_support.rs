//! Test utilities for store clients.
//!
//! [`StubTransport`] answers every request with a scripted outcome and
//! records what it was sent.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::transport::{Transport, TransportError, TransportResponse};

/// A request observed by [`StubTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    /// XML document posted to `url`.
    Post {
        /// Request URL.
        url: String,
        /// Posted document.
        body: String,
    },
    /// `GET` of `url`.
    Get {
        /// Request URL.
        url: String,
    },
}

/// Scripted [`Transport`] for tests.
///
/// # Example
///
/// ```
/// use live_locations_core::{PositionReading, UserId};
/// use live_locations_sync::SyncClient;
/// use live_locations_sync::test_support::StubTransport;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let client = SyncClient::new(StubTransport::responding(200, ""));
/// let reading = PositionReading::new(1.0, 2.0, 3.0, 4);
/// assert!(client.upload(&reading, &UserId::from("u1"), None).await);
/// assert_eq!(client.transport().requests().len(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct StubTransport {
    outcome: Result<TransportResponse, TransportError>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    /// Answer every request with `status` and `body`.
    #[must_use]
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self::with_outcome(Ok(TransportResponse::new(status, body)))
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<TransportResponse, TransportError>) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    fn answer(&self, request: RecordedRequest) -> Result<TransportResponse, TransportError> {
        lock(&self.requests).push(request);
        self.outcome.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Transport for StubTransport {
    async fn post_xml(&self, url: &str, body: String) -> Result<TransportResponse, TransportError> {
        self.answer(RecordedRequest::Post {
            url: url.to_owned(),
            body,
        })
    }

    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.answer(RecordedRequest::Get {
            url: url.to_owned(),
        })
    }
}
