//! Error types emitted by the live-locations CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use live_locations_core::{PositionError, StoreConfigError};
use live_locations_geolocation::ReplayError;
use live_locations_sync::{SyncError, TransportBuildError};
use thiserror::Error;

/// Errors emitted by the live-locations CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The merged store settings are invalid.
    #[error("invalid store configuration: {0}")]
    InvalidStore(#[from] StoreConfigError),
    /// The async runtime could not start.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Constructing the HTTP transport failed.
    #[error(transparent)]
    BuildTransport(#[from] TransportBuildError),
    /// The store did not accept the reading.
    #[error("upload failed: {0}")]
    Upload(#[source] SyncError),
    /// The collection could not be retrieved.
    #[error("fetch failed: {0}")]
    Fetch(#[source] SyncError),
    /// Serialising fetched features failed.
    #[error("failed to serialise features: {0}")]
    SerialiseFeatures(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Opening a recorded track failed.
    #[error("failed to open replay file at {path:?}: {source}")]
    OpenReplay {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A recorded track could not be decoded.
    #[error("failed to load replay file at {path:?}: {source}")]
    ParseReplay {
        path: Utf8PathBuf,
        #[source]
        source: ReplayError,
    },
    /// The positioning source refused to start a watch.
    #[error("positioning failed: {0}")]
    Position(#[from] PositionError),
}
