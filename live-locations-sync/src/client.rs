//! Upload and retrieval of location features.

use live_locations_core::{
    EncodeError, FeatureCollection, PositionReading, StoreConfig, UserId,
    build_insert_transaction, encode,
};
use log::{debug, warn};
use thiserror::Error;

use crate::transport::{Transport, TransportError};
use crate::wfs::GetFeatureResponse;

/// Errors from a single store exchange.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The reading could not be encoded; nothing was sent.
    #[error("reading rejected before upload: {0}")]
    Encode(#[from] EncodeError),
    /// The exchange did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The store answered with a non-2xx status.
    #[error("store at {url} responded with status {status}")]
    Rejected {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body is not a feature collection.
    #[error("unparseable response from {url}: {message}")]
    Parse {
        /// Request URL.
        url: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Client for a WFS-T feature store.
///
/// Each call may pass an explicit [`StoreConfig`]; otherwise the client's own
/// configuration applies. Calls share no state beyond the transport.
///
/// # Example
///
/// ```no_run
/// use live_locations_core::{PositionReading, UserId};
/// use live_locations_sync::{HttpTransport, SyncClient};
///
/// # async fn run() -> Result<(), live_locations_sync::TransportBuildError> {
/// let client = SyncClient::new(HttpTransport::new()?);
/// let reading = PositionReading::new(37.7749, -122.4194, 12.0, 1_700_000_000_000);
/// if !client.upload(&reading, &UserId::from("u1"), None).await {
///     eprintln!("upload failed");
/// }
/// let everyone = client.fetch_all(None).await;
/// println!("{} users", everyone.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncClient<T> {
    transport: T,
    config: StoreConfig,
}

impl<T: Transport> SyncClient<T> {
    /// Client for the default store.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, StoreConfig::default())
    }

    /// Client whose calls default to `config`.
    pub const fn with_config(transport: T, config: StoreConfig) -> Self {
        Self { transport, config }
    }

    /// Configuration used when a call passes none.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    fn effective<'a>(&'a self, override_config: Option<&'a StoreConfig>) -> &'a StoreConfig {
        override_config.unwrap_or(&self.config)
    }

    /// Encode `reading` and insert it into the store.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Encode`] without contacting the store when the
    /// reading is invalid, and the other variants when the exchange fails or
    /// is answered with a non-2xx status.
    pub async fn try_upload(
        &self,
        reading: &PositionReading,
        user_id: &UserId,
        override_config: Option<&StoreConfig>,
    ) -> Result<(), SyncError> {
        let config = self.effective(override_config);
        let feature = encode(reading, user_id)?;
        let body =
            build_insert_transaction(&feature, user_id, reading.timestamp, reading.accuracy, config);
        let url = config.transaction_url();
        debug!("inserting location for {user_id} into {}", config.type_name());
        let response = self.transport.post_xml(&url, body).await?;
        if !response.is_success() {
            debug!("store rejected insert: {}", response.body);
            return Err(SyncError::Rejected {
                url,
                status: response.status,
            });
        }
        Ok(())
    }

    /// Insert `reading`, reporting success as a flag.
    ///
    /// Returns `true` exactly when the store answered with a 2xx status.
    /// Failures are logged, never raised.
    pub async fn upload(
        &self,
        reading: &PositionReading,
        user_id: &UserId,
        override_config: Option<&StoreConfig>,
    ) -> bool {
        match self.try_upload(reading, user_id, override_config).await {
            Ok(()) => true,
            Err(err) => {
                warn!("location upload for {user_id} failed: {err}");
                false
            }
        }
    }

    /// Retrieve every feature of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error when the exchange fails, the status is not 2xx, or
    /// the body is not a JSON feature collection.
    pub async fn try_fetch_all(
        &self,
        override_config: Option<&StoreConfig>,
    ) -> Result<FeatureCollection, SyncError> {
        let url = self.effective(override_config).get_feature_url();
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(SyncError::Rejected {
                url,
                status: response.status,
            });
        }
        let parsed = GetFeatureResponse::parse(&response.body).map_err(|err| SyncError::Parse {
            url: url.clone(),
            message: err.to_string(),
        })?;
        if let Some(count) = parsed.number_returned {
            debug!("store returned {count} features from {url}");
        }
        Ok(parsed.into_features())
    }

    /// Retrieve every feature, or an empty collection on any failure.
    pub async fn fetch_all(&self, override_config: Option<&StoreConfig>) -> FeatureCollection {
        self.try_fetch_all(override_config)
            .await
            .unwrap_or_else(|err| {
                warn!("location fetch failed: {err}");
                FeatureCollection::new()
            })
    }
}
