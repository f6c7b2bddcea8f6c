//! Positioning source adapter for the live location pipeline.
//!
//! Responsibilities:
//! - Wrap a platform positioning capability behind [`PositioningPlatform`].
//! - Offer one-shot fixes and cancellable streaming watches via
//!   [`Geolocator`].
//! - Normalise platform errors into [`live_locations_core::PositionError`].
//!
//! Boundaries:
//! - No encoding or network access; readings are handed to callers as-is.
//! - Watches are never cancelled automatically; callers own their lifetime.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use live_locations_core::PositionReading;
//! use live_locations_geolocation::{Geolocator, PositionEvent, ReplayPlatform};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let track = vec![
//!     PositionReading::new(51.5, -0.12, 5.0, 1_000),
//!     PositionReading::new(51.6, -0.13, 5.0, 2_000),
//! ];
//! let geolocator = Geolocator::new(ReplayPlatform::from_readings(track, Duration::ZERO));
//! let mut watch = geolocator.watch_position()?;
//! while let Some(PositionEvent::Reading(reading)) = watch.next().await {
//!     println!("{} {}", reading.latitude, reading.longitude);
//! }
//! # Ok::<(), live_locations_core::PositionError>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]

mod geolocator;
mod platform;
mod replay;
mod subscription;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use geolocator::Geolocator;
pub use platform::{NativeError, PositionOptions, PositionSink, PositioningPlatform};
pub use replay::{ReplayError, ReplayPlatform};
pub use subscription::{PositionEvent, Subscription, WatchId};
