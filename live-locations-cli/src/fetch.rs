//! Fetch command implementation.

use std::io::Write;

use clap::Parser;
use live_locations_core::{FeatureCollection, StoreConfig};
use live_locations_sync::{SyncClient, Transport};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::CliError;
use crate::store::{ARG_COLLECTION, ARG_ENDPOINT, ARG_NAMESPACE, resolve_store};

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "fetch",
    long_about = "Retrieve every stored location feature with a WFS \
                 GetFeature request and print the collection as JSON.",
    about = "Print every user's stored location"
)]
#[ortho_config(prefix = "LIVE_LOCATIONS")]
pub(crate) struct FetchArgs {
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

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        resolve_store(merged.endpoint, merged.namespace, merged.collection)
    }
}

pub(crate) async fn run_fetch_with<T: Transport>(
    store: &StoreConfig,
    client: &SyncClient<T>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let features = client
        .try_fetch_all(Some(store))
        .await
        .map_err(CliError::Fetch)?;
    write_features(writer, &features)
}

fn write_features(writer: &mut dyn Write, features: &FeatureCollection) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(features).map_err(CliError::SerialiseFeatures)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}
