//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = live_locations_cli::run() {
        eprintln!("live-locations: {err}");
        std::process::exit(1);
    }
}
