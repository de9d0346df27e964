use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Step of a probe that ran out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Connect,
    DriverGetInfo,
}

impl std::fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStage::Connect => f.write_str("connect"),
            ProbeStage::DriverGetInfo => f.write_str("DriverGetInfo"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid driver address: {0}")]
    InvalidAddress(String),

    #[error("Failed to establish connection to COSI driver: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("DriverGetInfo call failed: {0}")]
    Rpc(#[from] tonic::Status),

    #[error("Probe deadline of {timeout:?} exceeded during {stage}")]
    DeadlineExceeded { stage: ProbeStage, timeout: Duration },
}

impl ProbeError {
    /// Whether the failure happened before a connection was established.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            ProbeError::InvalidAddress(_)
                | ProbeError::Connect(_)
                | ProbeError::DeadlineExceeded {
                    stage: ProbeStage::Connect,
                    ..
                }
        )
    }
}

/// Every probe failure is reported as a bare 500; details only go to the log.
impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        if self.is_connect_failure() {
            tracing::error!(error = %self, "Failed to establish connection to COSI driver");
        } else {
            tracing::error!(error = %self, "Health check failed");
        }
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
