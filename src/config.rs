//! Client configuration.
//!
//! Transport options are collected in [`ClientConfig`] and handed to the
//! HTTP client at construction time. They are read-only afterwards.

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::error::{Result, SambaSafetyError};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.sambasafety.com/v1";

/// Fixed client identifier sent as `User-Agent` on every request.
pub const USER_AGENT: &str = concat!("sambasafety-rust/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_KEY: &str = "SAMBASAFETY_API_KEY";
const ENV_API_URL: &str = "SAMBASAFETY_API_URL";
const ENV_TIMEOUT: &str = "SAMBASAFETY_TIMEOUT_SECS";

/// Transport options for [`SambaSafetyClient`](crate::SambaSafetyClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sambasafety::ClientConfig;
///
/// let config = ClientConfig::default()
///     .timeout(Duration::from_secs(10))
///     .header("X-Account-Id", "acme");
/// assert_eq!(config.timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Total request timeout.
    pub timeout: Duration,
    /// Optional connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Extra headers sent with every request, passed through unmodified.
    pub headers: BTreeMap<String, String>,
    /// Client identifier header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: None,
            headers: BTreeMap::new(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Add an extra header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Read the optional timeout from `SAMBASAFETY_TIMEOUT_SECS`.
    ///
    /// Unparsable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let config = Self::default();
        match env::var(ENV_TIMEOUT).ok().and_then(|v| v.trim().parse::<u64>().ok()) {
            Some(secs) => config.timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Credentials and endpoint resolved from the environment.
#[derive(Debug, Clone)]
pub(crate) struct EnvSettings {
    pub api_key: String,
    pub base_url: String,
    pub config: ClientConfig,
}

impl EnvSettings {
    /// Load `SAMBASAFETY_API_KEY`, `SAMBASAFETY_API_URL` and the timeout.
    pub fn load() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| {
            SambaSafetyError::ConfigMissing(format!("{ENV_API_KEY} environment variable not set"))
        })?;

        let base_url = env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            config: ClientConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.connect_timeout.is_none());
        assert!(config.headers.is_empty());
        assert!(config.user_agent.starts_with("sambasafety-rust/"));
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::default()
            .connect_timeout(Duration::from_secs(5))
            .header("X-Trace", "1")
            .header("X-Trace", "2");
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("2"));
    }
}
