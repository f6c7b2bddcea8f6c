//! Upload command implementation.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use live_locations_core::{PositionReading, StoreConfig, UserId};
use live_locations_sync::{SyncClient, Transport};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{ARG_COLLECTION, ARG_ENDPOINT, ARG_NAMESPACE, resolve_store};
use crate::{ARG_USER, CliError};

pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ENV_UPLOAD_USER: &str = "LIVE_LOCATIONS_CMDS_UPLOAD_USER";
pub(crate) const ENV_UPLOAD_LATITUDE: &str = "LIVE_LOCATIONS_CMDS_UPLOAD_LATITUDE";
pub(crate) const ENV_UPLOAD_LONGITUDE: &str = "LIVE_LOCATIONS_CMDS_UPLOAD_LONGITUDE";

/// CLI arguments for the `upload` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "upload",
    long_about = "Encode one position reading and insert it into the feature \
                 store with a WFS-T transaction. The timestamp defaults to \
                 the current time.",
    about = "Upload a single position reading"
)]
#[ortho_config(prefix = "LIVE_LOCATIONS")]
pub(crate) struct UploadArgs {
    /// Identifier of the user the reading belongs to.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Latitude in decimal degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Horizontal accuracy in metres.
    #[arg(long, value_name = "metres")]
    #[serde(default)]
    pub(crate) accuracy: Option<f64>,
    /// Capture time in milliseconds since the Unix epoch.
    #[arg(long, value_name = "millis")]
    #[serde(default)]
    pub(crate) timestamp: Option<u64>,
    /// Base URL of the feature store (e.g. "http://localhost:8080/geoserver").
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

impl UploadArgs {
    pub(crate) fn into_config(self) -> Result<UploadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        UploadConfig::try_from(merged)
    }
}

/// Resolved `upload` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UploadConfig {
    pub(crate) user: UserId,
    pub(crate) reading: PositionReading,
    pub(crate) store: StoreConfig,
}

impl TryFrom<UploadArgs> for UploadConfig {
    type Error = CliError;

    fn try_from(args: UploadArgs) -> Result<Self, Self::Error> {
        let user = args.user.ok_or(CliError::MissingArgument {
            field: ARG_USER,
            env: ENV_UPLOAD_USER,
        })?;
        let latitude = args.latitude.ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_UPLOAD_LATITUDE,
        })?;
        let longitude = args.longitude.ok_or(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_UPLOAD_LONGITUDE,
        })?;
        let reading = PositionReading::new(
            latitude,
            longitude,
            args.accuracy.unwrap_or(0.0),
            args.timestamp.unwrap_or_else(now_millis),
        );
        let store = resolve_store(args.endpoint, args.namespace, args.collection)?;
        Ok(Self {
            user: UserId::new(user),
            reading,
            store,
        })
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

pub(crate) async fn run_upload_with<T: Transport>(
    config: &UploadConfig,
    client: &SyncClient<T>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    client
        .try_upload(&config.reading, &config.user, Some(&config.store))
        .await
        .map_err(CliError::Upload)?;
    writeln!(
        writer,
        "uploaded location for {} to {}",
        config.user,
        config.store.type_name()
    )
    .map_err(CliError::WriteOutput)
}
