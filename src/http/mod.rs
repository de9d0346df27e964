//! HTTP server module.
//!
//! The server runs in its own task so the main flow can wait on the shutdown
//! signal. A listener that fails to bind or stops serving triggers the same
//! shutdown path as an OS signal.

mod server;
mod shutdown;

pub use server::{bind_listener, serve, spawn_server, ServerError};
pub use shutdown::{
    install_signal_handlers, ShutdownCause, ShutdownSignal, EXIT_LISTENER_FAILED, EXIT_SIGNAL,
};
