//! HTTP transport module
//!
//! Provides the transport with retry, credential refresh, rate limiting, and
//! backoff strategies.
//!
//! # Features
//!
//! - **Automatic Retries**: Retry state machine with configurable backoff
//! - **Credential Refresh**: One refresh per call on HTTP 401
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Identity Headers**: Desktop app identity block on every request
//! - **Deadlines**: Bound on total wall-clock time of a call

mod client;
mod identity;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestSpec, DEFAULT_TIMEOUT};
pub use identity::{ClientIdentity, DEFAULT_APP_VERSION};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{run_with_retry, Attempt, AttemptOutcome, RetryDecision, RetryPolicy};
