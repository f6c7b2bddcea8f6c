//! Test utilities for positioning adapters.
//!
//! [`ScriptedPlatform`] is a deterministic [`PositioningPlatform`] returning
//! pre-configured responses and recording the options it was asked for.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use live_locations_core::PositionReading;

use crate::platform::{NativeError, PositionOptions, PositionSink, PositioningPlatform};

#[derive(Debug, Clone, Default)]
enum OneShot {
    Reading(PositionReading),
    Error(NativeError),
    #[default]
    Hang,
}

/// Scripted positioning platform for tests.
///
/// # Example
///
/// ```
/// use live_locations_core::PositionReading;
/// use live_locations_geolocation::Geolocator;
/// use live_locations_geolocation::test_support::ScriptedPlatform;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let reading = PositionReading::new(1.0, 2.0, 3.0, 4);
/// let geolocator = Geolocator::new(ScriptedPlatform::with_reading(reading));
/// assert_eq!(geolocator.get_current_position().await, Ok(reading));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    one_shot: OneShot,
    stream: Vec<Result<PositionReading, NativeError>>,
    keep_open: bool,
    sinks: Mutex<Vec<PositionSink>>,
    requests: Mutex<Vec<PositionOptions>>,
}

impl ScriptedPlatform {
    /// One-shot requests succeed with `reading`.
    #[must_use]
    pub fn with_reading(reading: PositionReading) -> Self {
        Self {
            one_shot: OneShot::Reading(reading),
            ..Self::default()
        }
    }

    /// One-shot requests fail with `error`.
    #[must_use]
    pub fn with_error(error: NativeError) -> Self {
        Self {
            one_shot: OneShot::Error(error),
            ..Self::default()
        }
    }

    /// One-shot requests never complete.
    #[must_use]
    pub fn hanging() -> Self {
        Self::default()
    }

    /// Streaming watches deliver `events` immediately, then end.
    #[must_use]
    pub fn with_stream(events: Vec<Result<PositionReading, NativeError>>) -> Self {
        Self {
            stream: events,
            ..Self::default()
        }
    }

    /// Keep streaming watches open after the scripted events so tests can
    /// push more with [`ScriptedPlatform::push_reading`].
    #[must_use]
    pub fn keep_open(mut self) -> Self {
        self.keep_open = true;
        self
    }

    /// Deliver `reading` to every open watch. Returns how many accepted it.
    pub fn push_reading(&self, reading: PositionReading) -> usize {
        let mut sinks = lock(&self.sinks);
        sinks.retain(|sink| !sink.is_closed());
        sinks.iter().filter(|sink| sink.reading(reading)).count()
    }

    /// Deliver `error` to every open watch. Returns how many accepted it.
    pub fn push_error(&self, error: &NativeError) -> usize {
        let mut sinks = lock(&self.sinks);
        sinks.retain(|sink| !sink.is_closed());
        sinks.iter().filter(|sink| sink.error(error.clone())).count()
    }

    /// Number of watches whose subscriber is still listening.
    #[must_use]
    pub fn open_watches(&self) -> usize {
        lock(&self.sinks)
            .iter()
            .filter(|sink| !sink.is_closed())
            .count()
    }

    /// Options received so far, in request order.
    #[must_use]
    pub fn recorded_options(&self) -> Vec<PositionOptions> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl PositioningPlatform for ScriptedPlatform {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionReading, NativeError> {
        lock(&self.requests).push(*options);
        match &self.one_shot {
            OneShot::Reading(reading) => Ok(*reading),
            OneShot::Error(error) => Err(error.clone()),
            OneShot::Hang => std::future::pending().await,
        }
    }

    fn watch_position(&self, options: &PositionOptions, sink: PositionSink) {
        lock(&self.requests).push(*options);
        for event in &self.stream {
            let delivered = match event {
                Ok(reading) => sink.reading(*reading),
                Err(error) => sink.error(error.clone()),
            };
            if !delivered {
                return;
            }
        }
        if self.keep_open {
            lock(&self.sinks).push(sink);
        }
    }
}
