//! Settings for the reqwest transport, read from the `[http]` table.

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

use crate::error::{BarionError, Result};

/// Accepted request timeouts, in seconds.
pub const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;

/// Accepted connect timeouts, in seconds.
pub const CONNECT_TIMEOUT_RANGE: RangeInclusive<u64> = 1..=60;

/// Connection pool and timeout settings for [`HttpTransport`](super::HttpTransport).
///
/// Every key is optional; missing keys take the [`Default`] values.
///
/// # Examples
///
/// ```toml
/// [http]
/// timeout_secs = 20
/// user_agent = "my-shop/1.0"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Idle keep-alive connections kept per gateway host.
    pub pool_max_idle_per_host: usize,

    /// Whole-request timeout, in seconds.
    pub timeout_secs: u64,

    /// TCP and TLS connect timeout, in seconds.
    pub connect_timeout_secs: u64,

    /// `User-Agent` header sent with every gateway request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("barion-rs/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl HttpConfig {
    /// Checks timeouts against [`TIMEOUT_RANGE`] and [`CONNECT_TIMEOUT_RANGE`] and
    /// that the user agent is usable as a header value.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        within("timeout_secs", self.timeout_secs, &TIMEOUT_RANGE)?;
        within("connect_timeout_secs", self.connect_timeout_secs, &CONNECT_TIMEOUT_RANGE)?;
        if self.user_agent.trim().is_empty() || self.user_agent.chars().any(char::is_control) {
            return Err(BarionError::ConfigurationError(
                "user_agent must be non-empty printable text".to_owned(),
            ));
        }
        Ok(())
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn within(key: &str, value: u64, range: &RangeInclusive<u64>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(BarionError::ConfigurationError(format!(
        "{key} must be between {} and {}, got {value}",
        range.start(),
        range.end()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HttpConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("barion-rs/"));
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config: HttpConfig = toml::from_str("timeout_secs = 45\nuser_agent = \"shop/2.0\"").unwrap();
        assert_eq!(config, HttpConfig {
            timeout_secs: 45,
            user_agent: "shop/2.0".to_owned(),
            ..HttpConfig::default()
        });

        let empty: HttpConfig = toml::from_str("").unwrap();
        assert_eq!(empty, HttpConfig::default());
    }

    #[test]
    fn test_range_edges() {
        let edges = HttpConfig { timeout_secs: 300, connect_timeout_secs: 1, ..HttpConfig::default() };
        edges.validate().unwrap();

        let err = HttpConfig { timeout_secs: 301, ..HttpConfig::default() }.validate().unwrap_err();
        assert_eq!(err.to_string(), "configuration error: timeout_secs must be between 1 and 300, got 301");

        for invalid in [
            HttpConfig { timeout_secs: 0, ..HttpConfig::default() },
            HttpConfig { connect_timeout_secs: 0, ..HttpConfig::default() },
            HttpConfig { connect_timeout_secs: 61, ..HttpConfig::default() },
        ] {
            assert!(matches!(invalid.validate(), Err(BarionError::ConfigurationError(_))), "{invalid:?}");
        }
    }

    #[test]
    fn test_user_agent_must_be_a_header_value() {
        for agent in ["", "   ", "shop\r\nX-Injected: 1"] {
            let config = HttpConfig { user_agent: agent.to_owned(), ..HttpConfig::default() };
            assert!(config.validate().is_err(), "{agent:?}");
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(toml::from_str::<HttpConfig>("timeout_secs = \"soon\"").is_err());
    }
}
