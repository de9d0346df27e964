//! HTTP routes served by the relay.
//!
//! Only the health endpoint exists. Every request runs inside a request-ID
//! span so overlapping probes can be told apart in the logs.

pub mod health;

use axum::{middleware, routing::get, Router};

use crate::config::HEALTH_PATH;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health::healthz))
        .layer(middleware::from_fn(request_id_layer))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use tokio::net::UnixListener;
    use tokio::task::JoinHandle;
    use tokio_stream::wrappers::UnixListenerStream;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Cli;
    use crate::driver::proto::identity_server::{Identity, IdentityServer};
    use crate::driver::proto::{DriverGetInfoRequest, DriverGetInfoResponse};
    use crate::middleware::REQUEST_ID_HEADER;

    struct FakeDriver {
        healthy: bool,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    #[tonic::async_trait]
    impl Identity for FakeDriver {
        async fn driver_get_info(
            &self,
            _request: tonic::Request<DriverGetInfoRequest>,
        ) -> Result<tonic::Response<DriverGetInfoResponse>, tonic::Status> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if !self.healthy {
                return Err(tonic::Status::internal("storage backend unreachable"));
            }
            Ok(tonic::Response::new(DriverGetInfoResponse {
                name: "fake.cosi.example.com".to_string(),
            }))
        }
    }

    fn spawn_driver(
        socket: &Path,
        healthy: bool,
        delay: Duration,
    ) -> (Arc<AtomicUsize>, JoinHandle<()>) {
        let listener = UnixListener::bind(socket).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let driver = FakeDriver {
            healthy,
            delay,
            calls: calls.clone(),
        };
        let handle = tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(IdentityServer::new(driver))
                .serve_with_incoming(UnixListenerStream::new(listener))
                .await
                .unwrap();
        });
        (calls, handle)
    }

    fn router_for(socket: &Path, timeout: &str) -> Router {
        let cli = Cli::try_parse_from([
            "liveness-probe",
            "--driver-address",
            socket.to_str().unwrap(),
            "--probe-timeout",
            timeout,
        ])
        .unwrap();
        create_router(AppState::new(cli.into_config(None)))
    }

    async fn get_status(app: &Router, path: &str) -> StatusCode {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_healthz_ok_when_driver_answers() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("cosi.sock");
        let (_calls, server) = spawn_driver(&socket, true, Duration::ZERO);
        let app = router_for(&socket, "1s");

        assert_eq!(get_status(&app, "/healthz").await, StatusCode::OK);
        server.abort();
    }

    #[tokio::test]
    async fn test_healthz_500_when_socket_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router_for(&tmp.path().join("missing.sock"), "1s");

        let start = Instant::now();
        assert_eq!(
            get_status(&app, "/healthz").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_healthz_500_when_driver_reports_error() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("cosi.sock");
        let (_calls, server) = spawn_driver(&socket, false, Duration::ZERO);
        let app = router_for(&socket, "1s");

        assert_eq!(
            get_status(&app, "/healthz").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        server.abort();
    }

    #[tokio::test]
    async fn test_healthz_ok_with_slow_driver_inside_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("cosi.sock");
        let (_calls, server) = spawn_driver(&socket, true, Duration::from_millis(500));
        let app = router_for(&socket, "1s");

        assert_eq!(get_status(&app, "/healthz").await, StatusCode::OK);
        server.abort();
    }

    #[tokio::test]
    async fn test_healthz_500_after_timeout_when_driver_hangs() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("cosi.sock");
        let (_calls, server) = spawn_driver(&socket, true, Duration::from_secs(30));
        let app = router_for(&socket, "1s");

        let start = Instant::now();
        let status = get_status(&app, "/healthz").await;
        let elapsed = start.elapsed();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(elapsed >= Duration::from_millis(950), "too early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2000), "too late: {elapsed:?}");
        server.abort();
    }

    #[tokio::test]
    async fn test_healthz_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let healthy_socket = tmp.path().join("healthy.sock");
        let failing_socket = tmp.path().join("failing.sock");
        let (calls, healthy) = spawn_driver(&healthy_socket, true, Duration::ZERO);
        let (_, failing) = spawn_driver(&failing_socket, false, Duration::ZERO);
        let healthy_app = router_for(&healthy_socket, "1s");
        let failing_app = router_for(&failing_socket, "1s");

        for _ in 0..5 {
            assert_eq!(get_status(&healthy_app, "/healthz").await, StatusCode::OK);
            assert_eq!(
                get_status(&failing_app, "/healthz").await,
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
        // One RPC per probe, no retries.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        healthy.abort();
        failing.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_probes_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("cosi.sock");
        let (calls, server) = spawn_driver(&socket, true, Duration::from_millis(100));
        let app = router_for(&socket, "1s");

        let probes: Vec<_> = (0..16)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { get_status(&app, "/healthz").await })
            })
            .collect();

        for probe in probes {
            assert_eq!(probe.await.unwrap(), StatusCode::OK);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 16);
        server.abort();
    }

    #[tokio::test]
    async fn test_every_response_carries_request_id() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router_for(&tmp.path().join("missing.sock"), "1s");

        let mut seen = Vec::new();
        for _ in 0..2 {
            let request = Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let id = response
                .headers()
                .get(&REQUEST_ID_HEADER)
                .expect("x-request-id header missing")
                .to_str()
                .unwrap()
                .to_string();
            assert!(uuid::Uuid::parse_str(&id).is_ok(), "not a uuid: {id}");
            seen.push(id);
        }
        assert_ne!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = router_for(&tmp.path().join("cosi.sock"), "1s");

        assert_eq!(get_status(&app, "/readyz").await, StatusCode::NOT_FOUND);
    }
}
