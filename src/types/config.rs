//! Configuration structures.
//!
//! Configuration is built once at startup, from the environment or from CLI
//! flags, and handed to the gateway and server by reference.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{Error, Result};

/// Environment variable holding the remote service base address.
pub const ENV_API_BASE: &str = "BOTEMAIL_API";
/// Environment variable holding the optional default API key.
pub const ENV_API_KEY: &str = "BOTEMAIL_API_KEY";
/// Environment variable holding the outbound timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "BOTEMAIL_TIMEOUT_SECS";
/// Environment variable selecting the log format (`json` or anything else).
pub const ENV_LOG_FORMAT: &str = "BOTEMAIL_LOG_FORMAT";

/// Public BotEmail service address.
pub const DEFAULT_API_BASE: &str = "https://botemail.ai";

/// Global process configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote BotEmail service.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Stdio server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::read_lookup(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a key lookup without validating it, so callers
    /// can layer overrides first. Blank values count as unset.
    pub fn read_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut remote = RemoteConfig::default();
        if let Some(base) = get(ENV_API_BASE) {
            remote.base_url = base;
        }
        remote.default_api_key = get(ENV_API_KEY);
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            remote.timeout = Duration::from_secs(secs);
        }

        let mut config = Config {
            remote,
            ..Config::default()
        };
        config.observability.json_logs = get(ENV_LOG_FORMAT)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Ok(config)
    }

    /// Normalise and sanity-check values.
    pub fn validate(&mut self) -> Result<()> {
        self.remote.base_url = self.remote.base_url.trim().trim_end_matches('/').to_string();
        if self.remote.base_url.is_empty() {
            return Err(Error::config("remote base address cannot be empty"));
        }
        if !(self.remote.base_url.starts_with("http://")
            || self.remote.base_url.starts_with("https://"))
        {
            return Err(Error::config(format!(
                "remote base address must be http(s), got '{}'",
                self.remote.base_url
            )));
        }
        if self.remote.timeout.is_zero() {
            return Err(Error::config("remote timeout must be greater than zero"));
        }
        if self.server.max_in_flight == 0 {
            return Err(Error::config("max_in_flight must be greater than zero"));
        }
        Ok(())
    }
}

/// Remote BotEmail service configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base address, without trailing slash.
    pub base_url: String,

    /// Fallback credential used when a call omits `apiKey`.
    #[serde(skip_serializing)]
    pub default_api_key: Option<String>,

    /// Per-request timeout for outbound calls.
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("default_api_key", &self.default_api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            default_api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Stdio server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported in `initialize`.
    pub name: String,

    /// Version reported in `initialize`.
    pub version: String,

    /// Maximum accepted size of one inbound JSON-RPC line.
    pub max_line_bytes: usize,

    /// Maximum concurrently executing tool calls. Further calls wait for a slot.
    pub max_in_flight: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "botemail-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_line_bytes: 1024 * 1024,
            max_in_flight: 64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
