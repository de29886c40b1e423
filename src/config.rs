//! Gateway configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Unset or unparseable values fall back to defaults, except
//! for the few that would silently change behavior (see [`ConfigError`]).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::tables::source::TABLE_PLACEHOLDER;

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR '{0}'")]
    InvalidListenAddr(String),

    /// `QRG_TABLES_URL` lacks the `{table}` placeholder.
    #[error("QRG_TABLES_URL must contain '{{table}}': {0}")]
    InvalidTablesUrl(String),
}

/// Where lookup tables are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablesLocation {
    /// Directory of `{name}.json` files.
    Local(PathBuf),
    /// URL template containing `{table}`.
    Remote(String),
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Verbose logging toggle (`DEBUG=1`).
    pub debug: bool,

    /// Shared secret for the cache flush endpoint. `None` disables it.
    pub admin_password: Option<String>,

    /// Lookup table origin.
    pub tables: TablesLocation,

    /// Timeout for one remote table fetch.
    pub tables_fetch_timeout: Duration,

    /// Upper bound on a single outbound device send.
    pub device_send_timeout: Duration,

    /// Outbound queue depth per device connection.
    pub device_outbound_capacity: usize,

    /// Echo inbound device messages back (diagnostics).
    pub device_echo_enabled: bool,

    /// Keep-alive ping interval on device sockets. `None` disables pings.
    pub ws_ping_interval: Option<Duration>,

    /// How long a device may stay silent after a ping. `None` never drops it.
    pub ws_ping_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `LISTEN_ADDR` cannot be parsed or
    /// `QRG_TABLES_URL` has no `{table}` placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(raw_addr.clone()))?;

        let tables = match non_empty_env("QRG_TABLES_URL") {
            Some(url) if url.contains(TABLE_PLACEHOLDER) => TablesLocation::Remote(url),
            Some(url) => return Err(ConfigError::InvalidTablesUrl(url)),
            None => TablesLocation::Local(PathBuf::from(
                non_empty_env("QRG_TABLES_DIR").unwrap_or_else(|| "qrg_to_mode_tables".to_string()),
            )),
        };

        let ping_secs: u64 = parse_env("WS_PING_INTERVAL_SECS", 10);
        let ping_timeout_secs: u64 = parse_env("WS_PING_TIMEOUT_SECS", 10);

        Ok(Self {
            listen_addr,
            debug: parse_env_bool("DEBUG", false),
            admin_password: non_empty_env("ADMIN_PASSWORD"),
            tables,
            tables_fetch_timeout: Duration::from_secs(parse_env("QRG_TABLES_FETCH_TIMEOUT_SECS", 10)),
            device_send_timeout: Duration::from_millis(parse_env("DEVICE_SEND_TIMEOUT_MS", 5_000)),
            device_outbound_capacity: parse_env("DEVICE_OUTBOUND_CAPACITY", 32),
            device_echo_enabled: parse_env_bool("DEVICE_ECHO_ENABLED", true),
            ws_ping_interval: seconds_or_off(ping_secs),
            ws_ping_timeout: seconds_or_off(ping_timeout_secs),
        })
    }

    /// Default log filter when `RUST_LOG` is unset.
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

/// `0` turns the setting off.
fn seconds_or_off(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Returns the variable's value unless it is unset or blank.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    parse_bool(std::env::var(key).ok().as_deref(), default)
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
