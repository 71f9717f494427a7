//! Playground configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

/// Default TCP port for the coordinate-automation companion process.
pub const DEFAULT_AUTO_SERVER_PORT: u16 = 1412;

/// Top-level playground configuration.
///
/// Loaded once at startup via [`PlaygroundConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PlaygroundConfig {
    /// Socket address to bind the HTTP server to (e.g. `127.0.0.1:5800`).
    pub listen_addr: SocketAddr,

    /// TCP port the auto-server listens on.
    pub auto_server_port: u16,

    /// Command used to launch the auto-server (e.g. `python3`).
    pub auto_server_command: String,

    /// Path of the automation entry point passed to the command.
    pub auto_server_script: String,

    /// Timeout in milliseconds for the TCP liveness probe.
    pub probe_timeout_ms: u64,

    /// How long to wait after spawning before re-checking liveness.
    pub startup_grace_ms: u64,

    /// Seconds between automatic health checks.
    pub monitor_interval_secs: u64,

    /// Timeout in seconds for HTTP requests forwarded to the auto-server.
    pub upstream_timeout_secs: u64,

    /// Broadens debug logging scope when `VERBOSE=true`.
    pub verbose: bool,
}

impl PlaygroundConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5800".to_string())
            .parse()?;

        let auto_server_port = parse_env("AUTO_SERVER_PORT", DEFAULT_AUTO_SERVER_PORT);

        let auto_server_command =
            std::env::var("AUTO_SERVER_COMMAND").unwrap_or_else(|_| "python3".to_string());
        let auto_server_script = std::env::var("AUTO_SERVER_SCRIPT")
            .unwrap_or_else(|_| "idb/auto_server.py".to_string());

        let probe_timeout_ms = parse_env("AUTO_SERVER_PROBE_TIMEOUT_MS", 1_000);
        let startup_grace_ms = parse_env("AUTO_SERVER_STARTUP_GRACE_MS", 2_000);
        let monitor_interval_secs = parse_env("AUTO_SERVER_MONITOR_INTERVAL_SECS", 30);
        let upstream_timeout_secs = parse_env("UPSTREAM_REQUEST_TIMEOUT_SECS", 30);

        let verbose = parse_env_bool("VERBOSE", false);

        Ok(Self {
            listen_addr,
            auto_server_port,
            auto_server_command,
            auto_server_script,
            probe_timeout_ms,
            startup_grace_ms,
            monitor_interval_secs,
            upstream_timeout_secs,
            verbose,
        })
    }

    /// Base URL of the auto-server HTTP API.
    #[must_use]
    pub fn auto_server_url(&self) -> String {
        format!("http://localhost:{}", self.auto_server_port)
    }
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
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_config(port: u16) -> PlaygroundConfig {
        let Ok(listen_addr) = "127.0.0.1:5800".parse() else {
            panic!("valid addr");
        };
        PlaygroundConfig {
            listen_addr,
            auto_server_port: port,
            auto_server_command: "python3".to_string(),
            auto_server_script: "idb/auto_server.py".to_string(),
            probe_timeout_ms: 1_000,
            startup_grace_ms: 2_000,
            monitor_interval_secs: 30,
            upstream_timeout_secs: 30,
            verbose: false,
        }
    }

    #[test]
    fn auto_server_url_uses_configured_port() {
        let config = make_config(9999);
        assert_eq!(config.auto_server_url(), "http://localhost:9999");
    }

    #[test]
    fn parse_env_falls_back_on_missing() {
        let value: u16 = parse_env("MIRROR_PLAYGROUND_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn parse_env_bool_falls_back_on_missing() {
        assert!(parse_env_bool("MIRROR_PLAYGROUND_UNSET_KEY", true));
        assert!(!parse_env_bool("MIRROR_PLAYGROUND_UNSET_KEY", false));
    }
}
