//! Positioning source adapter.
//!
//! [`Geolocator`] wraps an optional [`PositioningPlatform`] and offers the
//! one-shot and streaming operations with fixed request options. A geolocator
//! built with [`Geolocator::unsupported`] fails every request immediately with
//! the capability-missing error instead of waiting for a fix that never comes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use live_locations_core::{PositionError, PositionReading};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::platform::{PositionOptions, PositionSink, PositioningPlatform};
use crate::subscription::{PositionEvent, Subscription, WatchId};

type WatchRegistry = Arc<Mutex<HashMap<WatchId, CancellationToken>>>;

/// Source of position readings backed by a platform capability.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use live_locations_core::PositionReading;
/// use live_locations_geolocation::{Geolocator, ReplayPlatform};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let reading = PositionReading::new(37.7749, -122.4194, 15.0, 1_700_000_000_000);
/// let platform = ReplayPlatform::from_readings(vec![reading], Duration::ZERO);
/// let geolocator = Geolocator::new(platform);
/// assert_eq!(geolocator.get_current_position().await, Ok(reading));
/// # });
/// ```
pub struct Geolocator<P> {
    platform: Option<Arc<P>>,
    one_shot: PositionOptions,
    streaming: PositionOptions,
    next_id: AtomicI64,
    watches: WatchRegistry,
}

impl<P> std::fmt::Debug for Geolocator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geolocator")
            .field("supported", &self.platform.is_some())
            .field("one_shot", &self.one_shot)
            .field("streaming", &self.streaming)
            .field("active_watches", &lock(&self.watches).len())
            .finish()
    }
}

impl<P: PositioningPlatform + 'static> Geolocator<P> {
    /// Wrap a platform with positioning capability.
    pub fn new(platform: P) -> Self {
        Self::from_shared(Arc::new(platform))
    }

    /// Wrap a platform shared with other owners.
    pub fn from_shared(platform: Arc<P>) -> Self {
        Self::build(Some(platform))
    }

    /// A geolocator for a platform without positioning capability.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::build(None)
    }

    fn build(platform: Option<Arc<P>>) -> Self {
        Self {
            platform,
            one_shot: PositionOptions::ONE_SHOT,
            streaming: PositionOptions::STREAMING,
            next_id: AtomicI64::new(1),
            watches: Arc::default(),
        }
    }

    /// Whether a platform capability is present.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.platform.is_some()
    }

    /// Request a single fresh, high-accuracy fix.
    ///
    /// Fails with the capability-missing error straight away when
    /// unsupported, and with a timeout error when no fix arrives within the
    /// one-shot deadline.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`PositionError`] for any sensing failure.
    pub async fn get_current_position(&self) -> Result<PositionReading, PositionError> {
        let Some(platform) = self.platform.as_ref() else {
            return Err(PositionError::unsupported());
        };
        let options = self.one_shot;
        match tokio::time::timeout(options.timeout, platform.current_position(&options)).await {
            Ok(Ok(reading)) => Ok(reading),
            Ok(Err(native)) => {
                debug!("platform rejected position request: {native}");
                Err(native.into())
            }
            Err(_) => {
                warn!(
                    "no position fix within {} ms",
                    options.timeout.as_millis()
                );
                Err(PositionError::timeout())
            }
        }
    }

    /// Start a streaming watch and return it as a [`Subscription`].
    ///
    /// # Errors
    ///
    /// Returns the capability-missing error when unsupported.
    pub fn watch_position(&self) -> Result<Subscription, PositionError> {
        let platform = self.platform.as_ref().ok_or_else(PositionError::unsupported)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = WatchId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        platform.watch_position(&self.streaming, PositionSink::new(sender));
        debug!("started position watch {id}");
        Ok(Subscription::new(id, receiver))
    }

    /// Start a streaming watch delivering events to callbacks.
    ///
    /// Each reading invokes `on_reading` and each failure `on_error`, one at
    /// a time. When unsupported, `on_error` runs before this returns and the
    /// result is [`WatchId::INVALID`]. Stop the watch with
    /// [`Geolocator::clear_watch`].
    ///
    /// Delivery runs on a spawned task. On a current-thread runtime, or any
    /// caller sharing that task's thread, no callback runs once
    /// `clear_watch` returns, even for events already queued. On a
    /// multi-thread runtime a callback that had already started when the
    /// watch was cleared runs to completion, so at most one further event is
    /// observed.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, since delivery runs on a
    /// spawned task.
    pub fn watch_position_with<R, E>(&self, mut on_reading: R, mut on_error: E) -> WatchId
    where
        R: FnMut(PositionReading) + Send + 'static,
        E: FnMut(PositionError) + Send + 'static,
    {
        let mut subscription = match self.watch_position() {
            Ok(subscription) => subscription,
            Err(err) => {
                on_error(err);
                return WatchId::INVALID;
            }
        };
        let id = subscription.id();
        let token = CancellationToken::new();
        lock(&self.watches).insert(id, token.clone());
        let watches = Arc::clone(&self.watches);

        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    event = subscription.next() => event,
                };
                let Some(event) = event else { break };
                // Cancellation may land while the event was in flight.
                if token.is_cancelled() {
                    break;
                }
                match event {
                    PositionEvent::Reading(reading) => on_reading(reading),
                    PositionEvent::Error(error) => on_error(error),
                }
            }
            subscription.cancel();
            lock(&watches).remove(&id);
        });
        id
    }

    /// Stop a watch started with [`Geolocator::watch_position_with`].
    ///
    /// Unknown, invalid and already-cleared identifiers are ignored. Events
    /// queued but not yet handed to a callback are discarded; see
    /// [`Geolocator::watch_position_with`] for the guarantee on multi-thread
    /// runtimes.
    pub fn clear_watch(&self, id: WatchId) {
        if !id.is_valid() {
            return;
        }
        if let Some(token) = lock(&self.watches).remove(&id) {
            token.cancel();
            debug!("cleared position watch {id}");
        }
    }

    /// Number of callback watches still delivering.
    #[must_use]
    pub fn active_watches(&self) -> usize {
        lock(&self.watches).len()
    }
}

fn lock(
    watches: &Mutex<HashMap<WatchId, CancellationToken>>,
) -> MutexGuard<'_, HashMap<WatchId, CancellationToken>> {
    watches.lock().unwrap_or_else(PoisonError::into_inner)
}
