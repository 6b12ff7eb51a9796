//! HTTP client with retry, token refresh and rate limiting
//!
//! Provides the transport that handles:
//! - One HTTP exchange per attempt with a full-attempt timeout
//! - The identity header block and bearer credential on every request
//! - Automatic retries with configurable backoff and retry-after hints
//! - A caller deadline covering all attempts of a call

use super::identity::ClientIdentity;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::retry::{run_with_retry, Attempt, RetryPolicy};
use crate::auth::{Authenticator, Credential};
use crate::error::{classify_status, classify_transport, Error, Result};
use crate::types::{BackoffType, JsonValue, Method};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retry budget and backoff
    pub retry: RetryPolicy,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Identity header block
    pub identity: ClientIdentity,
    /// Additional default headers for all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            rate_limit: None,
            identity: ClientIdentity::default(),
            default_headers: HashMap::new(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.retry.backoff_type = backoff_type;
        self.config.retry.base_delay = initial;
        self.config.retry.max_delay = max;
        self
    }

    /// Set the floor applied to every retry delay
    pub fn min_delay(mut self, floor: Duration) -> Self {
        self.config.retry.min_delay = floor;
        self
    }

    /// Replace the whole retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set the identity header block
    pub fn identity(mut self, identity: ClientIdentity) -> Self {
        self.config.identity = identity;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Request Spec
// ============================================================================

/// One logical call: immutable once built, re-issued verbatim on retry
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Versioned path (`/v1/...`) or absolute URL
    pub path: String,
    /// JSON body; `None` is sent as `{}` on POST
    pub body: Option<JsonValue>,
    /// Override the per-attempt timeout
    pub timeout: Option<Duration>,
    /// Override the retry budget
    pub max_retries: Option<u32>,
    /// Bound on total wall-clock time across all attempts
    pub deadline: Option<Duration>,
}

impl RequestSpec {
    /// A POST to `path`
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
            timeout: None,
            max_retries: None,
            deadline: None,
        }
    }

    /// A GET to `path`
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            ..Self::post(path)
        }
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set per-attempt timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set a deadline covering every attempt and backoff sleep
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Transport: one connection pool, immutable configuration, shared by all
/// calls
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create an anonymous HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create an anonymous HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, Authenticator::anonymous())
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, authenticator: Authenticator) -> Result<Self> {
        let mut headers = config.identity.header_map()?;
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::config(format!("invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(config.identity.user_agent())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator,
            rate_limiter,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the authenticator
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Execute a call with retries, returning the raw 2xx body
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Bytes> {
        let mut attempts = Vec::new();
        self.execute_traced(spec, &mut attempts).await
    }

    /// Like [`execute`](Self::execute), recording every attempt
    #[instrument(skip(self, spec, attempts), fields(method = %spec.method, path = %spec.path))]
    pub async fn execute_traced(
        &self,
        spec: &RequestSpec,
        attempts: &mut Vec<Attempt>,
    ) -> Result<Bytes> {
        let policy = match spec.max_retries {
            Some(retries) => self.config.retry.clone().with_max_retries(retries),
            None => self.config.retry.clone(),
        };

        let run = run_with_retry(&policy, &self.authenticator, attempts, |credential| {
            async move { self.send_once(spec, credential.as_ref()).await }
        });

        let Some(deadline) = spec.deadline else {
            return run.await;
        };

        let outcome = tokio::time::timeout(deadline, run).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                debug!(?deadline, attempts = attempts.len(), "Call deadline exceeded");
                Err(Error::timeout(format!(
                    "deadline of {deadline:?} exceeded after {} attempt(s)",
                    attempts.len()
                )))
            }
        }
    }

    /// Perform exactly one HTTP exchange
    pub async fn send_once(
        &self,
        spec: &RequestSpec,
        credential: Option<&Credential>,
    ) -> Result<Bytes> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let url = self.build_url(&spec.path);
        let timeout = spec.timeout.unwrap_or(self.config.timeout);

        let mut req = self
            .client
            .request(spec.method.into(), &url)
            .timeout(timeout);

        if let Some(credential) = credential {
            req = req.bearer_auth(&credential.access_token);
        }

        if spec.method == Method::POST {
            let empty = JsonValue::Object(serde_json::Map::new());
            req = req.json(spec.body.as_ref().unwrap_or(&empty));
        }

        let response = req.send().await.map_err(|e| classify_transport(&e))?;
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "Request succeeded: {} {}", spec.method, url);
            return response.bytes().await.map_err(|e| classify_transport(&e));
        }

        let retry_after = parse_retry_after(response.headers());
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            }
        };
        debug!(status = status.as_u16(), "Request failed: {} {}", spec.method, url);
        Err(classify_status(status.as_u16(), body, retry_after))
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract the retry-after hint (delta-seconds or HTTP date)
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    if let Ok(seconds) = raw.parse::<f64>() {
        // Negative, NaN or beyond Duration::MAX counts as no hint
        return Duration::try_from_secs_f64(seconds).ok();
    }

    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    Some((at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}
