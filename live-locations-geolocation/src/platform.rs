//! Seam between the adapter and the platform's positioning capability.

use std::time::Duration;

use async_trait::async_trait;
use live_locations_core::{PositionError, PositionReading};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::PositionEvent;

/// Options passed to the platform with every position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most accurate fix the hardware can deliver.
    pub enable_high_accuracy: bool,
    /// Longest time the platform may take to produce a fix.
    pub timeout: Duration,
    /// Oldest cached fix the platform may return instead of a fresh one.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// One-shot requests: high accuracy, ten second deadline, always fresh.
    pub const ONE_SHOT: Self = Self {
        enable_high_accuracy: true,
        timeout: Duration::from_secs(10),
        maximum_age: Duration::ZERO,
    };

    /// Streaming requests: high accuracy, cached fixes up to five seconds old.
    pub const STREAMING: Self = Self {
        enable_high_accuracy: true,
        timeout: Duration::from_secs(10),
        maximum_age: Duration::from_secs(5),
    };
}

/// Error reported by a platform in its own vocabulary.
///
/// The adapter normalises these into [`PositionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("platform error {code}: {message}")]
pub struct NativeError {
    /// Platform-specific numeric code.
    pub code: u16,
    /// Platform-supplied description.
    pub message: String,
}

impl NativeError {
    /// Construct a native error.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<NativeError> for PositionError {
    fn from(value: NativeError) -> Self {
        Self::from_native(value.code, value.message)
    }
}

/// Receiving end handed to a platform for a streaming watch.
///
/// Platforms push readings and errors into the sink until it reports closed,
/// which happens once the subscriber cancels or is dropped.
#[derive(Debug, Clone)]
pub struct PositionSink {
    sender: UnboundedSender<PositionEvent>,
}

impl PositionSink {
    pub(crate) const fn new(sender: UnboundedSender<PositionEvent>) -> Self {
        Self { sender }
    }

    /// Deliver a reading. Returns `false` when the subscriber has gone.
    pub fn reading(&self, reading: PositionReading) -> bool {
        self.sender.send(PositionEvent::Reading(reading)).is_ok()
    }

    /// Deliver a native error. Returns `false` when the subscriber has gone.
    pub fn error(&self, error: NativeError) -> bool {
        self.sender
            .send(PositionEvent::Error(PositionError::from(error)))
            .is_ok()
    }

    /// Whether the subscriber has cancelled or been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Resolve once the subscriber has cancelled or been dropped.
    pub async fn closed(&self) {
        self.sender.closed().await;
    }
}

/// A platform capable of sensing the device position.
///
/// Implementations wrap whatever the host offers (a GNSS receiver, an OS
/// location service, a recorded track). Platforms without any capability are
/// modelled by [`crate::Geolocator::unsupported`], not by an implementation.
#[async_trait]
pub trait PositioningPlatform: Send + Sync {
    /// Produce a single fix honouring `options`.
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionReading, NativeError>;

    /// Start delivering fixes into `sink` until it closes.
    ///
    /// The platform decides the cadence and may coalesce readings. It must
    /// not block; long-running delivery belongs on a spawned task.
    fn watch_position(&self, options: &PositionOptions, sink: PositionSink);
}
