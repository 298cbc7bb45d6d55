//! Client configuration.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{OmiError, OmiResult};

/// Production endpoint of the Omi API.
pub const DEFAULT_BASE_URL: &str = "https://api.omi.me/v1";

/// Upper bound on every network call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remaining-request count assumed before the server has told us otherwise.
pub const DEFAULT_RATE_LIMIT_CEILING: u32 = 100;

/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "OMI_API_TOKEN";

/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "OMI_API_URL";

/// Configuration for the Omi API client.
///
/// The rate-limit fields are advisory. Limits are enforced by the server
/// and only mirrored locally for diagnostics.
#[derive(Debug)]
pub struct ClientConfig {
    api_token: SecretString,
    /// Base URL every resource path is appended to.
    base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Initial (and fallback) value of the remaining-request counter.
    pub rate_limit_requests: Option<u32>,
    /// Length of the server's rate-limit window. Informational only.
    pub rate_limit_window: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration for the production endpoint.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            rate_limit_requests: None,
            rate_limit_window: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `OMI_API_TOKEN` is required; `OMI_API_URL` is optional.
    pub fn from_env() -> OmiResult<Self> {
        let token = std::env::var(ENV_API_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| OmiError::configuration(format!("{} is not set", ENV_API_TOKEN)))?;

        let mut config = Self::new(token);
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rate_limit(mut self, requests: u32, window: Duration) -> Self {
        self.rate_limit_requests = Some(requests);
        self.rate_limit_window = Some(window);
        self
    }

    /// The bearer token.
    pub fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Ceiling used for the remaining-request counter.
    pub fn rate_limit_ceiling(&self) -> i64 {
        i64::from(self.rate_limit_requests.unwrap_or(DEFAULT_RATE_LIMIT_CEILING))
    }

    /// Check that the token is present and the base URL is usable.
    pub fn validate(&self) -> OmiResult<()> {
        if self.api_token().trim().is_empty() {
            return Err(OmiError::configuration("API token must not be empty"));
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| OmiError::configuration(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OmiError::configuration(format!(
                "Unsupported base URL scheme '{}'",
                url.scheme()
            )));
        }

        if self.timeout.is_zero() {
            return Err(OmiError::configuration("Timeout must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("token");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.rate_limit_ceiling(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let config = ClientConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert_eq!(config.api_token(), "super-secret");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("t").with_base_url("http://localhost:9000/v1/");
        assert_eq!(config.base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_validation_failures() {
        assert!(ClientConfig::new("  ").validate().is_err());
        assert!(ClientConfig::new("t").with_base_url("not a url").validate().is_err());
        assert!(ClientConfig::new("t")
            .with_base_url("ftp://example.com")
            .validate()
            .is_err());
        assert!(ClientConfig::new("t")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_custom_ceiling() {
        let config = ClientConfig::new("t").with_rate_limit(250, Duration::from_secs(60));
        assert_eq!(config.rate_limit_ceiling(), 250);
    }
}
