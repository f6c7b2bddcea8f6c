//! Positioning platform replaying a recorded track.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use live_locations_core::PositionReading;
use log::debug;
use thiserror::Error;

use crate::platform::{NativeError, PositionOptions, PositionSink, PositioningPlatform};

/// Native code reported when the recording holds no readings.
const POSITION_UNAVAILABLE: u16 = 2;

/// Errors raised while loading a recorded track.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The recording is not a JSON array of readings.
    #[error("failed to parse recorded readings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Replays readings in order at a fixed interval.
///
/// One-shot requests return the most recent recorded reading. Each streaming
/// watch replays the full recording from the start and then ends.
#[derive(Debug, Clone)]
pub struct ReplayPlatform {
    readings: Arc<[PositionReading]>,
    interval: Duration,
}

impl ReplayPlatform {
    /// Replay `readings`, waiting `interval` between consecutive deliveries.
    #[must_use]
    pub fn from_readings(readings: Vec<PositionReading>, interval: Duration) -> Self {
        Self {
            readings: readings.into(),
            interval,
        }
    }

    /// Load a JSON array of readings, e.g.
    /// `[{"latitude": 51.5, "longitude": -0.1, "accuracy": 5, "timestamp": 0}]`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Parse`] when the input is not such an array.
    pub fn from_json_reader(reader: impl Read, interval: Duration) -> Result<Self, ReplayError> {
        let readings: Vec<PositionReading> = serde_json::from_reader(reader)?;
        Ok(Self::from_readings(readings, interval))
    }

    /// Number of recorded readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the recording is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[async_trait]
impl PositioningPlatform for ReplayPlatform {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<PositionReading, NativeError> {
        self.readings
            .last()
            .copied()
            .ok_or_else(|| NativeError::new(POSITION_UNAVAILABLE, "recording holds no readings"))
    }

    fn watch_position(&self, _options: &PositionOptions, sink: PositionSink) {
        let readings = Arc::clone(&self.readings);
        let interval = self.interval;
        tokio::spawn(async move {
            for (index, reading) in readings.iter().enumerate() {
                if index > 0 && !interval.is_zero() {
                    tokio::select! {
                        () = sink.closed() => break,
                        () = tokio::time::sleep(interval) => {}
                    }
                }
                if !sink.reading(*reading) {
                    break;
                }
            }
            debug!("replay finished");
        });
    }
}
