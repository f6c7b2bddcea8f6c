//! Synchronisation of location features with a WFS-T store.
//!
//! [`SyncClient`] encodes readings, posts insert transactions and reads the
//! whole collection back as GeoJSON. Network access goes through the
//! [`Transport`] trait; [`HttpTransport`] is the production implementation.

#![forbid(unsafe_code)]

mod client;
mod http;
mod transport;
mod wfs;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{SyncClient, SyncError};
pub use http::{DEFAULT_USER_AGENT, HttpTransport, HttpTransportConfig, TransportBuildError};
pub use transport::{Transport, TransportError, TransportResponse};
