//! HTTP transport, retry logic and client configuration.
//!
//! Endpoint wrappers never talk to reqwest directly. They build an
//! [`ApiRequest`] and hand it to an injected [`ApiTransport`]; [`ServiceClient`]
//! is the reqwest-backed implementation used in production.

use crate::config::FortiOsConfig;
use crate::error::{
    describe_fortios_code, Error, Result, FORTIOS_DUPLICATE_ENTRY, FORTIOS_ENTRY_NOT_FOUND,
};
use crate::response::ApiResponse;
use crate::types::{ApiRequest, API_VERSION};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for FortiOS requests (seconds)
pub const FORTIOS_DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

const USER_AGENT: &str = concat!("fortios-rs/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
///
/// Configures how HTTP requests should be retried on failure, using exponential
/// backoff to avoid overwhelming a busy management plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt-1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(u64::from(multiplier));
        let delay = Duration::from_millis(delay_ms);

        std::cmp::min(delay, self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts, retries, and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Retry policy
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(FORTIOS_DEFAULT_TIMEOUT),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport abstraction used by every endpoint wrapper.
///
/// Implementations send one [`ApiRequest`] and decode the FortiOS envelope,
/// mapping error statuses onto [`Error`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send a request and return the decoded response envelope.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures and for any response FortiOS
    /// reports as unsuccessful.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    token: Option<SecretString>,
    vdom: Option<String>,
    verify_tls: bool,
    ca_cert: Option<std::path::PathBuf>,
    http_config: ClientConfig,
    user_agent: String,
}

impl ServiceClientBuilder {
    /// Create a builder for the given management base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self {
            base_url,
            token: None,
            vdom: None,
            verify_tls: true,
            ca_cert: None,
            http_config: ClientConfig::new(),
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Create a builder pre-populated from a [`FortiOsConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured host is not a valid http(s) URL.
    pub fn from_config(config: &FortiOsConfig) -> Result<Self> {
        let base_url = config.parse_host()?;
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries));

        Ok(Self {
            base_url,
            token: config.api_token.clone(),
            vdom: config.vdom.clone(),
            verify_tls: config.verify_tls,
            ca_cert: config.ca_cert.clone(),
            http_config,
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Configure the REST API bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Configure the default VDOM.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Trust an additional PEM CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.ca_cert = Some(path);
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config = self.http_config.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA certificate cannot be loaded or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(self.http_config.timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
            .gzip(self.http_config.enable_compression);

        if !self.verify_tls {
            warn!(host = %self.base_url, "TLS verification disabled for FortiOS client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.ca_cert {
            debug!("loading FortiOS CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        if self.token.is_none() {
            debug!(host = %self.base_url, "FortiOS client built without an API token");
        }

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
            token: self.token,
            vdom: self.vdom,
            retry_policy: self.http_config.retry_policy,
            enable_logging: self.http_config.enable_logging,
        })
    }
}

/// reqwest-backed [`ApiTransport`] talking to a FortiGate management interface.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
    token: Option<SecretString>,
    vdom: Option<String>,
    retry_policy: RetryPolicy,
    enable_logging: bool,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("vdom", &self.vdom)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ServiceClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a [`FortiOsConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &FortiOsConfig) -> Result<Self> {
        ServiceClientBuilder::from_config(config)?.build()
    }

    /// Start a builder for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn builder(base_url: impl AsRef<str>) -> Result<ServiceClientBuilder> {
        ServiceClientBuilder::new(base_url)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the default VDOM.
    #[must_use]
    pub fn default_vdom(&self) -> Option<&str> {
        self.vdom.as_deref()
    }

    /// Build the full URL for a request: `{base}/api/v2/{family}/{path}/{mkey}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path, or
    /// [`Error::ValidationError`] if the mkey cannot be sent as exactly one
    /// path segment.
    pub fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!("Base URL `{}` cannot be a base", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(["api", API_VERSION, request.family.name()]);
            segments.extend(request.path.split('/').filter(|part| !part.is_empty()));
            if let Some(mkey) = &request.mkey {
                segments.push(checked_mkey(request, mkey)?);
            }
        }
        Ok(url)
    }

    fn query_for(&self, request: &ApiRequest) -> Vec<(&'static str, String)> {
        let mut params = request.params.clone();
        if let Some(vdom) = &self.vdom {
            if request.param("vdom").is_none() {
                params.push(("vdom", vdom.clone()));
            }
        }
        params
    }

    async fn send_once(&self, request: &ApiRequest, url: &Url) -> Result<ApiResponse> {
        let params = self.query_for(request);
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .query(&params)
            .header("Accept", "application/json");

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(map_status_to_error(status, &request.resource_label(), &text));
        }

        if text.trim().is_empty() {
            return Ok(ApiResponse {
                http_method: Some(request.method.to_string()),
                status: Some("success".to_string()),
                http_status: Some(status.as_u16()),
                ..ApiResponse::default()
            });
        }

        let envelope: ApiResponse = serde_json::from_str(&text).map_err(|err| {
            Error::ResponseParseError(format!(
                "Failed to parse response for `{}`: {err}",
                request.resource_label()
            ))
        })?;

        if !envelope.is_success() {
            let embedded = envelope
                .http_status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Err(map_status_to_error(embedded, &request.resource_label(), &text));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl ApiTransport for ServiceClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.build_url(&request)?;
        let may_retry = request.is_idempotent() && self.retry_policy.has_retries();
        let mut attempt = 0;

        loop {
            if self.enable_logging {
                info!(method = %request.method, url = %url, attempt, "Sending FortiOS request");
            }

            let error = match self.send_once(&request, &url).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if !may_retry || !error.is_retryable() {
                if error.should_log() {
                    warn!(
                        resource = %request.resource_label(),
                        error = %error,
                        "FortiOS request failed"
                    );
                } else {
                    debug!(
                        resource = %request.resource_label(),
                        error = %error,
                        "FortiOS request failed"
                    );
                }
                return Err(error);
            }

            attempt += 1;
            if attempt > self.retry_policy.max_retries {
                warn!(
                    resource = %request.resource_label(),
                    attempts = attempt,
                    "FortiOS request failed after retries"
                );
                return Err(error);
            }

            let delay = self.retry_policy.delay_for_attempt(attempt);
            debug!(error = %error, ?delay, "Retrying FortiOS request");
            if delay > Duration::from_millis(0) {
                sleep(delay).await;
            }
        }
    }
}

// URL normalization drops `.` and `..` segments and an empty segment
// addresses the whole table, so none of them can name a single entry.
fn checked_mkey<'a>(request: &ApiRequest, mkey: &'a str) -> Result<&'a str> {
    if mkey.is_empty() || mkey == "." || mkey == ".." {
        return Err(Error::ValidationError(format!(
            "{}/{}: `{mkey}` is not a valid entry key",
            request.family.name(),
            request.path
        )));
    }
    Ok(mkey)
}

/// Map a failed HTTP status plus body onto [`Error`].
///
/// The body is decoded as a FortiOS envelope when possible so the numeric
/// `error` code and `cli_error` text end up in the message.
#[must_use]
pub fn map_status_to_error(status: StatusCode, resource: &str, body: &str) -> Error {
    let envelope = serde_json::from_str::<ApiResponse>(body).ok();
    let code = envelope.as_ref().and_then(|e| e.error).unwrap_or(0);
    let detail = envelope
        .as_ref()
        .and_then(|e| e.cli_error.clone())
        .or_else(|| describe_fortios_code(code).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.trim().to_string()
            }
        });
    let message = format!("{resource}: {detail}");

    match code {
        FORTIOS_DUPLICATE_ENTRY => return Error::Conflict(message),
        FORTIOS_ENTRY_NOT_FOUND => return Error::NotFound(message),
        _ => {}
    }

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST => Error::BadRequest(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::AuthenticationFailed(message),
        StatusCode::METHOD_NOT_ALLOWED => Error::InvalidRequest(message),
        StatusCode::CONFLICT => Error::Conflict(message),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("FortiOS temporarily unavailable: {message}"))
        }
        status if status.is_server_error() && code == 0 => {
            Error::ServiceUnavailable(format!("FortiOS server error {status}: {message}"))
        }
        status => Error::ApiError {
            http_status: status.as_u16(),
            code,
            message,
        },
    }
}
