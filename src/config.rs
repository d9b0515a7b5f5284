use std::env;

/// Public SondeHub v2 API root.
pub const DEFAULT_API_BASE: &str = "https://api.v2.sondehub.org/";

pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the SondeHub API; resource paths are appended to it.
    pub api_base: String,
    /// Seconds to let in-flight tool calls finish after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// - `HOST` (default `0.0.0.0`)
    /// - `PORT` (default `8080`)
    /// - `SONDEHUB_API_BASE` (default `https://api.v2.sondehub.org/`)
    /// - `SHUTDOWN_TIMEOUT` in seconds (default `5`)
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            api_base: env::var("SONDEHUB_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
        })
    }

    /// Configuration pointing at an explicit API base, other fields defaulted.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_base: api_base.into(),
            shutdown_timeout_secs: 0,
        }
    }
}
