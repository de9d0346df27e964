//! Health endpoint server startup.

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::shutdown::{ShutdownCause, ShutdownSignal};
use crate::config::ANY_HOST;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Server stopped unexpectedly")]
    Stopped,
}

/// IPv4 wildcard used when the host has no IPv6 stack
const IPV4_ANY_HOST: &str = "0.0.0.0";

/// Bind the health endpoint listener.
///
/// The `[::]` wildcard listens on IPv6 and IPv4; hosts without IPv6 fall
/// back to `0.0.0.0` on the same port.
pub async fn bind_listener(addr: &str) -> Result<TcpListener, ServerError> {
    let bind_error = |source: std::io::Error| ServerError::Bind {
        addr: addr.to_string(),
        source,
    };

    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) => match ipv4_fallback(addr, &e) {
            Some(fallback) => {
                tracing::warn!(
                    addr,
                    error = %e,
                    fallback = %fallback,
                    "IPv6 unavailable, binding IPv4 only"
                );
                TcpListener::bind(&fallback).await.map_err(bind_error)
            }
            None => Err(bind_error(e)),
        },
    }
}

/// IPv4 address to retry with when binding the IPv6 wildcard failed for a
/// reason other than the port being taken or forbidden.
fn ipv4_fallback(addr: &str, error: &std::io::Error) -> Option<String> {
    use std::io::ErrorKind;

    let port = addr.strip_prefix(ANY_HOST)?.strip_prefix(':')?;
    match error.kind() {
        ErrorKind::AddrInUse | ErrorKind::PermissionDenied => None,
        _ => Some(format!("{}:{}", IPV4_ANY_HOST, port)),
    }
}

/// Serve `app` on an already bound listener.
///
/// Never returns `Ok`: the server is only supposed to end with the process.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    match listener.local_addr() {
        Ok(addr) => tracing::info!(%addr, "Start probe http server successfully"),
        Err(e) => tracing::warn!(error = %e, "Probe http server started on unknown address"),
    }

    axum::serve(listener, app).await.map_err(ServerError::Serve)?;
    Err(ServerError::Stopped)
}

/// Run the server in a background task.
///
/// Any bind or serve failure is logged and turned into a
/// [`ShutdownCause::ListenerFailed`] trigger on `shutdown`.
pub fn spawn_server(app: Router, addr: String, shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match bind_listener(&addr).await {
            Ok(listener) => serve(listener, app).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::error!(addr = %addr, error = %e, "Probe http server listen failed");
            shutdown.trigger(ShutdownCause::ListenerFailed);
        }
    })
}
