//! Liveness endpoint for the COSI driver.
//!
//! Kubernetes polls this endpoint; a 500 here is what eventually gets the
//! driver's pod restarted. Retrying is left to the prober's polling cadence.

use axum::extract::State;
use http::StatusCode;

use crate::driver::probe_driver;
use crate::error::ProbeError;
use crate::state::AppState;

/// Health check handler.
///
/// Opens a fresh connection to the driver, calls `DriverGetInfo` once and
/// answers 200 on success. Any failure becomes an empty 500 via
/// [`ProbeError`]'s `IntoResponse`.
pub async fn healthz(State(state): State<AppState>) -> Result<StatusCode, ProbeError> {
    let config = &state.config;
    let info = probe_driver(&config.driver_socket, config.probe_timeout).await?;

    tracing::info!(driver = %info.name, "Health check successfully");
    Ok(StatusCode::OK)
}
