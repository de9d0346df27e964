//! Command-line configuration and defaults.
//!
//! Flags are parsed once at startup into [`Cli`] and converted into an immutable
//! [`ProbeConfig`] that is shared with the HTTP handlers. Nothing in here is
//! mutated after the server starts.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

// =============================================================================
// Defaults
// =============================================================================

/// Name this component registers its version under
pub const COMPONENT_NAME: &str = "liveness-probe";

/// Version recorded in the version file
pub const COMPONENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bound on each downstream RPC round trip
pub const DEFAULT_PROBE_TIMEOUT: &str = "1s";

/// Default driver socket path
pub const DEFAULT_DRIVER_ADDRESS: &str = "/var/lib/cosi/cosi.sock";

/// URI scheme accepted (and stripped) in front of the driver socket path
pub const UNIX_SCHEME: &str = "unix://";

/// Default health endpoint address (all interfaces, port 80)
pub const DEFAULT_HTTP_ENDPOINT: &str = "";

/// Port used when the health endpoint address does not name one
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Host used when the health endpoint address names none (IPv6 and IPv4)
pub const ANY_HOST: &str = "[::]";

/// Default log file name prefix
pub const DEFAULT_LOG_FILE: &str = "liveness-probe";

/// Default log directory
pub const DEFAULT_LOG_DIR: &str = "/var/log/cosi";

/// Log directory value that selects stdout instead of a file
pub const STDOUT_LOG_DIR: &str = "-";

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "cosi_liveness_probe=info,tower_http=info";

/// Default directory for the component version record
pub const DEFAULT_VERSION_DIR: &str = "/var/lib/cosi/version";

/// Route served by the health relay
pub const HEALTH_PATH: &str = "/healthz";

/// Liveness probe sidecar for COSI object storage drivers
#[derive(Parser, Debug, Clone)]
#[command(name = "liveness-probe", version, about)]
pub struct Cli {
    /// Bound on each probe's connection and RPC round trip (e.g. "1s", "500ms")
    #[arg(long, default_value = DEFAULT_PROBE_TIMEOUT, value_parser = parse_duration)]
    pub probe_timeout: Duration,

    /// Driver socket path, optionally prefixed with unix://
    #[arg(long, default_value = DEFAULT_DRIVER_ADDRESS)]
    pub driver_address: String,

    /// HTTP server endpoint for health probe checks (e.g. ":9808")
    #[arg(long, default_value = DEFAULT_HTTP_ENDPOINT)]
    pub http_endpoint: String,

    /// The log file name of the liveness probe
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// Directory for the log file, or "-" for stdout
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: String,

    /// Log level filter (e.g., "cosi_liveness_probe=debug")
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Absolute path to the kubeconfig file
    #[arg(long, default_value = "")]
    pub kube_config_path: String,

    /// Directory the component version record is written to
    #[arg(long, default_value = DEFAULT_VERSION_DIR)]
    pub version_dir: PathBuf,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub file_name: String,
    /// `None` logs to stdout
    pub directory: Option<PathBuf>,
    pub filter: String,
    pub format: LogFormat,
}

/// Immutable process-wide configuration for the relay.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Bounds connect plus the info call for one probe
    pub probe_timeout: Duration,
    /// Filesystem path of the driver's Unix socket
    pub driver_socket: PathBuf,
    /// `host:port` the health endpoint binds to
    pub http_endpoint: String,
    pub kube_config_path: Option<PathBuf>,
    pub version_dir: PathBuf,
    pub logging: LoggingSettings,
}

impl Cli {
    /// Resolve flags into the immutable runtime configuration.
    ///
    /// `env_filter` is the value of `RUST_LOG`, if any; it is only used when
    /// `--log-level` was not given.
    pub fn into_config(self, env_filter: Option<String>) -> ProbeConfig {
        let filter = self
            .log_level
            .or(env_filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let directory = if self.log_dir == STDOUT_LOG_DIR {
            None
        } else {
            Some(PathBuf::from(self.log_dir))
        };

        let kube_config_path = if self.kube_config_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(self.kube_config_path))
        };

        ProbeConfig {
            probe_timeout: self.probe_timeout,
            driver_socket: driver_socket_path(&self.driver_address),
            http_endpoint: normalize_http_endpoint(&self.http_endpoint),
            kube_config_path,
            version_dir: self.version_dir,
            logging: LoggingSettings {
                file_name: self.log_file,
                directory,
                filter,
                format: self.log_format,
            },
        }
    }
}

/// Strip an optional `unix://` scheme from a driver address.
pub fn driver_socket_path(address: &str) -> PathBuf {
    PathBuf::from(address.strip_prefix(UNIX_SCHEME).unwrap_or(address))
}

/// Turn a listen address into something `TcpListener::bind` accepts.
///
/// An empty address means every interface on port 80 and a bare `:port`
/// means every interface on that port.
pub fn normalize_http_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        format!("{}:{}", ANY_HOST, DEFAULT_HTTP_PORT)
    } else if let Some(port) = endpoint.strip_prefix(':') {
        format!("{}:{}", ANY_HOST, port)
    } else {
        endpoint.to_string()
    }
}

/// Parse a probe timeout such as `1s`, `500ms` or `1m30s`.
///
/// Zero and negative durations are rejected because a probe with no time
/// budget can never succeed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(format!("duration must be positive: {}", input));
    }

    let duration = humantime::parse_duration(input).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
