//! Facade crate for the live location pipeline.
//!
//! This crate re-exports the core reading, feature and store types and exposes
//! the positioning adapter and the store client behind feature flags.

#![forbid(unsafe_code)]

pub use live_locations_core::{
    DEFAULT_COLLECTION_NAME, DEFAULT_ENDPOINT_BASE, DEFAULT_NAMESPACE, EncodeError,
    PositionError, PositionErrorCode, PositionReading, PropertyValue, SpatialFeature, StoreConfig,
    StoreConfigError, StoreConfigOverride, UserId, build_insert_transaction, encode,
};

#[cfg(feature = "serde")]
pub use live_locations_core::{FeatureCollection, FeatureRecord, RecordGeometry};

#[cfg(feature = "geolocation")]
pub use live_locations_geolocation::{
    Geolocator, PositionEvent, PositionOptions, PositioningPlatform, ReplayPlatform, Subscription,
    WatchId,
};

#[cfg(feature = "sync")]
pub use live_locations_sync::{HttpTransport, HttpTransportConfig, SyncClient, SyncError, Transport};
