//! Liveness probe entry point.
//!
//! Parses flags, initialises logging, then hands over to [`app::run`] until a
//! termination signal or a listener failure stops the process.

use std::process::ExitCode;

use clap::Parser;

use cosi_liveness_probe::app::{self, EXIT_STARTUP_FAILURE};
use cosi_liveness_probe::config::Cli;
use cosi_liveness_probe::http::ShutdownSignal;
use cosi_liveness_probe::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // Log filter priority: CLI > env > default
    let config = args.into_config(std::env::var("RUST_LOG").ok());

    // Held until main returns so buffered log lines reach the file
    let _log_flusher = match init_logging(&config.logging) {
        Ok(flusher) => flusher,
        Err(e) => {
            eprintln!("init log failed, error is [{}]", e);
            return ExitCode::from(EXIT_STARTUP_FAILURE);
        }
    };

    match app::run(config, ShutdownSignal::new()).await {
        Ok(cause) => ExitCode::from(cause.exit_code()),
        Err(e) => {
            tracing::error!(error = %e, "Liveness probe failed to start");
            ExitCode::from(EXIT_STARTUP_FAILURE)
        }
    }
}
