//! Configuration structures for FortiOS clients.
//!
//! This module provides the connection configuration for a FortiGate
//! management interface, including authentication, VDOM scoping, TLS settings
//! and validation.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the management URL.
pub const ENV_HOST: &str = "FORTIOS_HOST";
/// Environment variable holding the REST API token.
pub const ENV_TOKEN: &str = "FORTIOS_TOKEN";
/// Environment variable holding the default VDOM.
pub const ENV_VDOM: &str = "FORTIOS_VDOM";
/// Environment variable toggling TLS verification (`false`/`0`/`no` disables).
pub const ENV_VERIFY_TLS: &str = "FORTIOS_VERIFY_TLS";

/// Configuration for a FortiOS client instance.
///
/// The API token is never serialized; it must be supplied through
/// [`FortiOsConfig::with_token`] or the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FortiOsConfig {
    /// Management base URL (e.g. `https://fw.example.com:8443`)
    #[validate(url)]
    pub host: String,

    /// REST API administrator token
    #[serde(default, skip_serializing)]
    pub api_token: Option<SecretString>,

    /// Default VDOM applied to every request that does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for idempotent requests
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// TTL for memoized reference endpoints, in seconds
    #[validate(range(min = 1, max = 86400))]
    #[serde(default = "default_reference_cache_ttl_secs")]
    pub reference_cache_ttl_secs: u64,
}

const fn default_verify_tls() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_reference_cache_ttl_secs() -> u64 {
    300
}

impl FortiOsConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Arguments
    ///
    /// * `host` - The management base URL (e.g., "https://192.0.2.1")
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            host: host.into(),
            api_token: None,
            vdom: None,
            verify_tls: default_verify_tls(),
            ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            reference_cache_ttl_secs: default_reference_cache_ttl_secs(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Build a configuration from `FORTIOS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `FORTIOS_HOST` is missing or the resulting
    /// configuration is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the host key is missing or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_HOST)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_HOST} is not set")))?;

        let mut config = Self::new(host)?;

        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(vdom) = lookup(ENV_VDOM).filter(|v| !v.is_empty()) {
            config = config.with_vdom(vdom);
        }
        if let Some(verify) = lookup(ENV_VERIFY_TLS) {
            let disabled = matches!(
                verify.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
            config = config.with_verify_tls(!disabled);
        }

        Ok(config)
    }

    /// Set the API token for authentication.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the default VDOM.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the reference endpoint cache TTL in seconds.
    #[must_use]
    pub const fn with_reference_cache_ttl(mut self, seconds: u64) -> Self {
        self.reference_cache_ttl_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the reference cache TTL as a Duration.
    #[must_use]
    pub const fn reference_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.reference_cache_ttl_secs)
    }

    /// Returns the token, if configured.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.api_token.as_ref().map(|token| token.expose_secret())
    }

    /// Parse and validate the host URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or is not http(s).
    pub fn parse_host(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.host)
            .map_err(|e| Error::ConfigError(format!("Invalid FortiOS host URL: {e}")))?;

        match url.scheme() {
            "https" | "http" => Ok(url),
            other => Err(Error::ConfigError(format!(
                "Unsupported URL scheme `{other}` for FortiOS host"
            ))),
        }
    }
}

impl Default for FortiOsConfig {
    fn default() -> Self {
        Self {
            host: "https://192.168.1.99".to_string(),
            api_token: None,
            vdom: None,
            verify_tls: default_verify_tls(),
            ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            reference_cache_ttl_secs: default_reference_cache_ttl_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_new() {
        let config = FortiOsConfig::new("https://fw.example.com").unwrap();
        assert_eq!(config.host, "https://fw.example.com");
        assert!(config.api_token.is_none());
        assert!(config.verify_tls);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.reference_cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_config_rejects_invalid_url() {
        let result = FortiOsConfig::new("not a url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = FortiOsConfig::new("https://fw.example.com:8443")
            .unwrap()
            .with_token("s3cr3t")
            .with_vdom("customer-a")
            .with_verify_tls(false)
            .with_timeout(60)
            .with_max_retries(5)
            .with_reference_cache_ttl(30);

        assert_eq!(config.token(), Some("s3cr3t"));
        assert_eq!(config.vdom.as_deref(), Some("customer-a"));
        assert!(!config.verify_tls);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.reference_cache_ttl_secs, 30);
    }

    #[test]
    fn test_validation_ranges() {
        let config = FortiOsConfig::default().with_timeout(0);
        assert!(config.validate().is_err());

        let config = FortiOsConfig::default().with_max_retries(11);
        assert!(config.validate().is_err());

        assert!(FortiOsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_token_never_serialized() {
        let config = FortiOsConfig::default().with_token("s3cr3t");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("s3cr3t"));
        assert!(!json.contains("api_token"));
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let config = FortiOsConfig::default().with_token("s3cr3t");
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: FortiOsConfig =
            serde_json::from_str(r#"{"host": "https://10.0.0.1", "vdom": "root"}"#).unwrap();
        assert_eq!(config.vdom.as_deref(), Some("root"));
        assert!(config.verify_tls);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_parse_host() {
        let config = FortiOsConfig::new("https://fw.example.com:8443").unwrap();
        let url = config.parse_host().unwrap();
        assert_eq!(url.port(), Some(8443));

        let config = FortiOsConfig::new("ftp://fw.example.com").unwrap();
        assert!(matches!(config.parse_host(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_HOST, "https://fw.example.com"),
            (ENV_TOKEN, "abc"),
            (ENV_VDOM, "root"),
            (ENV_VERIFY_TLS, "false"),
        ]);
        let config =
            FortiOsConfig::from_lookup(|key| vars.get(key).map(ToString::to_string)).unwrap();

        assert_eq!(config.token(), Some("abc"));
        assert_eq!(config.vdom.as_deref(), Some("root"));
        assert!(!config.verify_tls);
    }

    #[test]
    fn test_from_lookup_requires_host() {
        let result = FortiOsConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(Error::ConfigError(msg)) if msg.contains(ENV_HOST)));
    }
}
