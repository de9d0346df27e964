//! Shutdown notification and signal handling.
//!
//! Handles:
//! - SIGINT/SIGTERM/SIGQUIT/SIGHUP: stop the probe
//! - Listener failure: reported by the server task through the same signal
//!
//! No connection draining happens; in-flight probes die with the process.

use std::io;
use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

/// Exit code for a shutdown requested by the OS
pub const EXIT_SIGNAL: u8 = 0;

/// Exit code for a shutdown caused by the HTTP listener failing
pub const EXIT_LISTENER_FAILED: u8 = 2;

/// Why the probe is shutting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// An OS termination signal, by name
    Signal(&'static str),
    /// The HTTP listener could not bind or stopped serving
    ListenerFailed,
}

impl ShutdownCause {
    pub fn exit_code(&self) -> u8 {
        match self {
            ShutdownCause::Signal(_) => EXIT_SIGNAL,
            ShutdownCause::ListenerFailed => EXIT_LISTENER_FAILED,
        }
    }
}

impl std::fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownCause::Signal(name) => write!(f, "signal {}", name),
            ShutdownCause::ListenerFailed => f.write_str("listener failure"),
        }
    }
}

/// One-shot shutdown notification shared by every producer.
///
/// Only the first [`trigger`](Self::trigger) has an effect; later triggers are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
    cause: Arc<OnceLock<ShutdownCause>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Returns `false` if shutdown was already requested.
    pub fn trigger(&self, cause: ShutdownCause) -> bool {
        match self.cause.set(cause) {
            Ok(()) => {
                self.token.cancel();
                true
            }
            Err(ignored) => {
                tracing::debug!(%ignored, "Shutdown already requested, ignoring");
                false
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.cause.get().is_some()
    }

    /// Wait for the first trigger and return its cause.
    pub async fn wait(&self) -> ShutdownCause {
        loop {
            // The cause is stored before the token is cancelled.
            if let Some(cause) = self.cause.get() {
                return *cause;
            }
            self.token.cancelled().await;
        }
    }
}

/// Register OS signal handlers and forward the first signal to `shutdown`.
///
/// Registration happens before this returns, so signals delivered afterwards
/// are never lost to the default disposition.
#[cfg(unix)]
pub fn install_signal_handlers(shutdown: &ShutdownSignal) -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut hangup = signal(SignalKind::hangup())?;

    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = quit.recv() => "SIGQUIT",
            _ = hangup.recv() => "SIGHUP",
        };
        tracing::info!(signal = name, "Received termination signal");
        shutdown.trigger(ShutdownCause::Signal(name));
    });

    Ok(())
}

/// Only Ctrl+C is available off Unix.
#[cfg(not(unix))]
pub fn install_signal_handlers(shutdown: &ShutdownSignal) -> io::Result<()> {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C");
                shutdown.trigger(ShutdownCause::Signal("ctrl-c"));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        }
    });
    Ok(())
}
