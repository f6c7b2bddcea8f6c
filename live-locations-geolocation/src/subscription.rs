//! Cancellable stream of position events.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use live_locations_core::{PositionError, PositionReading};
use tokio::sync::mpsc::UnboundedReceiver;

/// One delivery from a streaming watch.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    /// A new fix.
    Reading(PositionReading),
    /// A sensing failure. The watch stays active afterwards.
    Error(PositionError),
}

impl PositionEvent {
    /// Convert into a `Result`, treating errors as `Err`.
    pub fn into_result(self) -> Result<PositionReading, PositionError> {
        match self {
            Self::Reading(reading) => Ok(reading),
            Self::Error(error) => Err(error),
        }
    }
}

/// Identifier of a streaming watch.
///
/// Valid identifiers are non-negative. [`WatchId::INVALID`] is returned when
/// a watch could not be started; clearing it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(i64);

impl WatchId {
    /// Identifier returned when no watch was started.
    pub const INVALID: Self = Self(-1);

    /// Wrap a raw identifier.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether the identifier could refer to a live watch.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live streaming watch.
///
/// Events arrive one at a time in platform order via [`Subscription::next`]
/// or the [`Stream`] implementation. After [`Subscription::cancel`] no
/// further events are yielded, including ones the platform had already
/// queued. Dropping the subscription cancels it as well. To watch again,
/// start a new subscription.
#[derive(Debug)]
pub struct Subscription {
    id: WatchId,
    events: UnboundedReceiver<PositionEvent>,
    cancelled: bool,
}

impl Subscription {
    pub(crate) const fn new(id: WatchId, events: UnboundedReceiver<PositionEvent>) -> Self {
        Self {
            id,
            events,
            cancelled: false,
        }
    }

    /// Identifier of this watch.
    #[must_use]
    pub const fn id(&self) -> WatchId {
        self.id
    }

    /// Whether [`Subscription::cancel`] has been called.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once cancelled or when the platform ends the stream.
    pub async fn next(&mut self) -> Option<PositionEvent> {
        if self.cancelled {
            return None;
        }
        self.events.recv().await
    }

    /// Stop the watch. Calling this more than once has no further effect.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        // Closing the receiver tells the platform's sink to stop.
        self.events.close();
        log::debug!("cancelled position watch {}", self.id);
    }
}

impl Stream for Subscription {
    type Item = PositionEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancelled {
            return Poll::Ready(None);
        }
        this.events.poll_recv(cx)
    }
}
