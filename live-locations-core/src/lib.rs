//! Core domain types for the live location pipeline.
//!
//! A [`PositionReading`] captured for a [`UserId`] is encoded into a
//! [`SpatialFeature`] and serialised into a WFS-T insert transaction that a
//! remote store accepts. Nothing in this crate performs I/O; the positioning
//! and network adapters live in sibling crates.

use std::fmt;

mod config;
mod feature;
mod position;
#[cfg(feature = "serde")]
mod record;
mod transaction;

pub use config::{
    DEFAULT_COLLECTION_NAME, DEFAULT_ENDPOINT_BASE, DEFAULT_NAMESPACE, StoreConfig,
    StoreConfigError, StoreConfigOverride,
};
pub use feature::{EncodeError, PropertyValue, SpatialFeature, encode};
pub use position::{PositionError, PositionErrorCode};
#[cfg(feature = "serde")]
pub use record::{FeatureCollection, FeatureRecord, RecordGeometry};
pub use transaction::build_insert_transaction;

/// Opaque identity of the user whose position is being shared.
///
/// Identities are supplied by the caller and stay stable for a session. The
/// value is never inspected, only copied into features and transactions.
///
/// # Examples
///
/// ```
/// use live_locations_core::UserId;
///
/// let user = UserId::new("u1");
/// assert_eq!(user.as_str(), "u1");
/// assert_eq!(user.to_string(), "u1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(String);

impl UserId {
    /// Wrap an externally supplied identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single positioning fix.
///
/// Coordinates are WGS84 degrees, `accuracy` is the radius of the fix in
/// metres and `timestamp` is the capture time in milliseconds since the Unix
/// epoch. Readings are plain values; bounds are checked when the reading is
/// encoded, see [`encode`].
///
/// # Examples
///
/// ```
/// use live_locations_core::PositionReading;
///
/// let reading = PositionReading::new(37.7749, -122.4194, 15.0, 1_700_000_000_000);
/// assert_eq!(reading.latitude, 37.7749);
/// assert_eq!(reading.timestamp, 1_700_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionReading {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Accuracy radius in metres.
    pub accuracy: f64,
    /// Capture time in epoch milliseconds.
    pub timestamp: u64,
}

impl PositionReading {
    /// Construct a reading from its raw parts.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: u64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp,
        }
    }
}
