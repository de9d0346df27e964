//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::ProbeConfig;

/// Read-only state handed to every probe request.
///
/// Handlers never mutate it, so concurrent probes need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProbeConfig>,
}

impl AppState {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
