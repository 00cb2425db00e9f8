//! Configuration options for the catalog console

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "CATALOG_API_URL";

/// Environment variable holding the request timeout in seconds
pub const REQUEST_TIMEOUT_ENV: &str = "CATALOG_REQUEST_TIMEOUT_SECS";

/// Used when no API base URL is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Configuration options for the catalog console
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the catalog API
    pub api_url: Url,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// How long a notification stays visible
    pub notification_ttl: Duration,
}

impl ConsoleConfig {
    /// Creates a configuration for `api_url`, validating it
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        })
    }

    /// Reads the configuration from the process environment.
    ///
    /// A missing `CATALOG_API_URL` falls back to the localhost default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(api_url.trim())?;

        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("{} must be a whole number of seconds, got `{}`", REQUEST_TIMEOUT_ENV, raw))
            })?;
            config.request_timeout = if secs == 0 {
                None
            } else {
                Some(Duration::from_secs(secs))
            };
        }

        Ok(config)
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the notification display time
    pub fn with_notification_ttl(mut self, value: Duration) -> Self {
        self.notification_ttl = value;
        self
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::config(format!(
            "API URL must use http or https, got `{}`",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_falls_back_to_localhost() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.request_timeout, Some(DEFAULT_REQUEST_TIMEOUT));
        assert_eq!(config.notification_ttl, DEFAULT_NOTIFICATION_TTL);
    }

    #[test]
    fn test_reads_environment_values() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            (API_URL_ENV, "https://catalog.example.com/api"),
            (REQUEST_TIMEOUT_ENV, "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_str(), "https://catalog.example.com/api");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config =
            ConsoleConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "0")])).unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ConsoleConfig::from_lookup(lookup_from(&[(API_URL_ENV, "localhost")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup_from(&[(API_URL_ENV, "ftp://files")])).is_err());
        assert!(matches!(
            ConsoleConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "soon")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = ConsoleConfig::new("http://127.0.0.1:8080")
            .unwrap()
            .with_request_timeout(None)
            .with_notification_ttl(Duration::from_millis(500))
            .with_api_url("http://10.0.0.2:9000")
            .unwrap();

        assert_eq!(config.api_url.port(), Some(9000));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.notification_ttl, Duration::from_millis(500));
    }
}
