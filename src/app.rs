//! Startup-to-shutdown lifecycle of the probe.
//!
//! `Initializing` registers the component version and installs signal
//! handlers, `Serving` runs the HTTP server in a background task, and the
//! first shutdown trigger moves to `ShuttingDown`. There is no way back.

use crate::config::{ProbeConfig, COMPONENT_NAME, COMPONENT_VERSION};
use crate::http::{install_signal_handlers, spawn_server, ShutdownCause, ShutdownSignal};
use crate::routes::create_router;
use crate::state::AppState;
use crate::version::{register_version, VersionError};

/// Exit code for fatal errors before the server starts
pub const EXIT_STARTUP_FAILURE: u8 = 1;

/// Fatal error before serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("init version file failed: {0}")]
    Version(#[from] VersionError),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),
}

/// Run the probe until `shutdown` fires and return why it stopped.
///
/// Logging must already be initialised. In-flight probes are not drained.
pub async fn run(
    config: ProbeConfig,
    shutdown: ShutdownSignal,
) -> Result<ShutdownCause, StartupError> {
    register_version(
        COMPONENT_NAME,
        COMPONENT_VERSION,
        config.kube_config_path.as_deref(),
        &config.version_dir,
    )?;

    install_signal_handlers(&shutdown)?;

    tracing::info!(
        driver = %config.driver_socket.display(),
        endpoint = %config.http_endpoint,
        timeout = ?config.probe_timeout,
        "Starting liveness probe"
    );

    let addr = config.http_endpoint.clone();
    let app = create_router(AppState::new(config));
    let server = spawn_server(app, addr, shutdown.clone());

    let cause = shutdown.wait().await;
    server.abort();
    tracing::warn!(%cause, "Stop probe service");
    Ok(cause)
}
