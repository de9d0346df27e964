//! Short-lived connections to the driver's Identity service.
//!
//! Each probe dials the driver's Unix socket, issues a single `DriverGetInfo`
//! call and drops the connection again. Nothing is pooled: a connection lives
//! exactly as long as the [`DriverConnection`] that owns it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tokio::time::{timeout_at, Instant};
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

use super::proto::identity_client::IdentityClient;
use super::proto::DriverGetInfoRequest;
use crate::error::{ProbeError, ProbeStage};

/// Authority used for the HTTP/2 requests; the connector ignores it and dials the socket
const UDS_PLACEHOLDER_URI: &str = "http://[::]:50051";

/// What the driver reported about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: String,
}

/// An open connection to the driver. Dropping it closes the connection.
#[derive(Debug)]
pub struct DriverConnection {
    client: IdentityClient<Channel>,
    socket: PathBuf,
    timeout: Duration,
}

impl DriverConnection {
    /// Dial the driver socket and wait until the connection is established.
    ///
    /// `timeout` is the full probe budget that `deadline` was derived from;
    /// it only appears in errors.
    pub async fn connect(
        socket: &Path,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        if socket.as_os_str().is_empty() {
            return Err(ProbeError::InvalidAddress("empty socket path".to_string()));
        }

        let endpoint = Endpoint::from_static(UDS_PLACEHOLDER_URI);
        let path = socket.to_path_buf();
        let connector = service_fn(move |_: Uri| {
            let path = path.clone();
            async move {
                let stream = UnixStream::connect(path).await?;
                Ok::<_, std::io::Error>(TokioIo::new(stream))
            }
        });

        let channel = timeout_at(deadline, endpoint.connect_with_connector(connector))
            .await
            .map_err(|_| ProbeError::DeadlineExceeded {
                stage: ProbeStage::Connect,
                timeout,
            })??;

        tracing::debug!(socket = %socket.display(), "Connected to COSI driver");
        Ok(Self {
            client: IdentityClient::new(channel),
            socket: socket.to_path_buf(),
            timeout,
        })
    }

    /// Issue one `DriverGetInfo` call bounded by `deadline`.
    pub async fn driver_get_info(&mut self, deadline: Instant) -> Result<DriverInfo, ProbeError> {
        let exceeded = ProbeError::DeadlineExceeded {
            stage: ProbeStage::DriverGetInfo,
            timeout: self.timeout,
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(exceeded);
        }

        // The driver sees the same deadline through grpc-timeout.
        let mut request = tonic::Request::new(DriverGetInfoRequest {});
        request.set_timeout(remaining);

        let response = timeout_at(deadline, self.client.driver_get_info(request))
            .await
            .map_err(|_| exceeded)??;

        Ok(DriverInfo {
            name: response.into_inner().name,
        })
    }
}

impl Drop for DriverConnection {
    fn drop(&mut self) {
        tracing::debug!(socket = %self.socket.display(), "Closing connection to COSI driver");
    }
}

/// Run one complete probe against the driver at `socket`.
///
/// Connect and call share a single deadline of `timeout` from now. The
/// connection is closed before this returns on every path.
pub async fn probe_driver(socket: &Path, timeout: Duration) -> Result<DriverInfo, ProbeError> {
    let deadline = Instant::now() + timeout;

    let mut connection = DriverConnection::connect(socket, deadline, timeout).await?;
    tracing::info!("Sending probe request to COSI driver");
    connection.driver_get_info(deadline).await
}
