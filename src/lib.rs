//! COSI liveness probe sidecar.
//!
//! Serves `/healthz` and answers each request by calling `DriverGetInfo` on the
//! COSI driver over its Unix socket: 200 when the driver answers in time, 500
//! otherwise.

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod version;

pub use error::ProbeError;
