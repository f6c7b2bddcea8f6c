//! Track command implementation.
//!
//! Replays a recorded track through a streaming watch and uploads each
//! reading as it arrives.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use live_locations_core::{StoreConfig, UserId};
use live_locations_fs::open_utf8_file;
use live_locations_geolocation::{Geolocator, ReplayPlatform};
use live_locations_sync::{SyncClient, Transport};
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{ARG_COLLECTION, ARG_ENDPOINT, ARG_NAMESPACE, resolve_store};
use crate::{ARG_USER, CliError};

pub(crate) const ARG_REPLAY: &str = "replay";
pub(crate) const ARG_INTERVAL_MS: &str = "interval-ms";
pub(crate) const ENV_TRACK_USER: &str = "LIVE_LOCATIONS_CMDS_TRACK_USER";
pub(crate) const ENV_TRACK_REPLAY: &str = "LIVE_LOCATIONS_CMDS_TRACK_REPLAY";

const DEFAULT_INTERVAL_MS: u64 = 1_000;

/// CLI arguments for the `track` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "track",
    long_about = "Replay a JSON recording of position readings as a live \
                 watch, uploading every reading to the feature store. \
                 Position errors are logged and skipped.",
    about = "Stream a recorded track into the store"
)]
#[ortho_config(prefix = "LIVE_LOCATIONS")]
pub(crate) struct TrackArgs {
    /// Identifier of the user being tracked.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// JSON array of recorded readings.
    #[arg(long = ARG_REPLAY, value_name = "path")]
    #[serde(default)]
    pub(crate) replay: Option<Utf8PathBuf>,
    /// Delay between replayed readings in milliseconds.
    #[arg(long = ARG_INTERVAL_MS, value_name = "millis")]
    #[serde(default)]
    pub(crate) interval_ms: Option<u64>,
    /// Base URL of the feature store.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// Store namespace (workspace).
    #[arg(long = ARG_NAMESPACE, value_name = "name")]
    #[serde(default)]
    pub(crate) namespace: Option<String>,
    /// Store collection (layer).
    #[arg(long = ARG_COLLECTION, value_name = "name")]
    #[serde(default)]
    pub(crate) collection: Option<String>,
}

impl TrackArgs {
    pub(crate) fn into_config(self) -> Result<TrackConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        TrackConfig::try_from(merged)
    }
}

/// Resolved `track` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackConfig {
    pub(crate) user: UserId,
    pub(crate) replay: Utf8PathBuf,
    pub(crate) interval: Duration,
    pub(crate) store: StoreConfig,
}

impl TryFrom<TrackArgs> for TrackConfig {
    type Error = CliError;

    fn try_from(args: TrackArgs) -> Result<Self, Self::Error> {
        let user = args.user.ok_or(CliError::MissingArgument {
            field: ARG_USER,
            env: ENV_TRACK_USER,
        })?;
        let replay = args.replay.ok_or(CliError::MissingArgument {
            field: ARG_REPLAY,
            env: ENV_TRACK_REPLAY,
        })?;
        let interval = Duration::from_millis(args.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS));
        let store = resolve_store(args.endpoint, args.namespace, args.collection)?;
        Ok(Self {
            user: UserId::new(user),
            replay,
            interval,
            store,
        })
    }
}

/// Outcome counts for one replayed track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TrackSummary {
    pub(crate) uploaded: usize,
    pub(crate) failed: usize,
    pub(crate) skipped: usize,
}

/// Loads a recorded track from disk.
pub(crate) fn load_replay(path: &Utf8Path, interval: Duration) -> Result<ReplayPlatform, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenReplay {
        path: path.to_path_buf(),
        source,
    })?;
    ReplayPlatform::from_json_reader(BufReader::new(file), interval).map_err(|source| {
        CliError::ParseReplay {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub(crate) async fn run_track_with<T: Transport>(
    config: &TrackConfig,
    client: &SyncClient<T>,
    writer: &mut dyn Write,
) -> Result<TrackSummary, CliError> {
    let platform = load_replay(&config.replay, config.interval)?;
    info!("replaying {} readings from {}", platform.len(), config.replay);
    let geolocator = Geolocator::new(platform);
    let mut watch = geolocator.watch_position()?;

    let mut summary = TrackSummary::default();
    while let Some(event) = watch.next().await {
        match event.into_result() {
            Ok(reading) => {
                if client
                    .upload(&reading, &config.user, Some(&config.store))
                    .await
                {
                    summary.uploaded += 1;
                } else {
                    summary.failed += 1;
                }
            }
            Err(err) => {
                warn!("skipping position error: {err}");
                summary.skipped += 1;
            }
        }
    }

    writeln!(
        writer,
        "uploaded {} readings for {} ({} failed, {} skipped)",
        summary.uploaded, config.user, summary.failed, summary.skipped
    )
    .map_err(CliError::WriteOutput)?;
    Ok(summary)
}
