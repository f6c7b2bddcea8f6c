//! Command-line interface for the live location pipeline.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use live_locations_sync::{HttpTransport, SyncClient};
use tokio::runtime::Runtime;

mod error;
mod fetch;
mod store;
mod track;
mod upload;

pub use error::CliError;

use fetch::{FetchArgs, run_fetch_with};
use track::{TrackArgs, run_track_with};
use upload::{UploadArgs, run_upload_with};

pub(crate) const ARG_USER: &str = "user";

/// Run the live-locations CLI with the current process arguments and
/// environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let runtime = build_runtime()?;
    let client = SyncClient::new(HttpTransport::new()?);
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Upload(args) => {
            let config = args.into_config()?;
            runtime.block_on(run_upload_with(&config, &client, &mut stdout))
        }
        Command::Fetch(args) => {
            let store = args.into_config()?;
            runtime.block_on(run_fetch_with(&store, &client, &mut stdout))
        }
        Command::Track(args) => {
            let config = args.into_config()?;
            runtime
                .block_on(run_track_with(&config, &client, &mut stdout))
                .map(|_| ())
        }
    }
}

fn build_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

#[derive(Debug, Parser)]
#[command(
    name = "live-locations",
    about = "Share positions through a WFS-T feature store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload one position reading.
    Upload(UploadArgs),
    /// Print every stored location as JSON.
    Fetch(FetchArgs),
    /// Replay a recorded track into the store.
    Track(TrackArgs),
}

#[cfg(test)]
mod tests;
