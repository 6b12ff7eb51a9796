//! Credential types
//!
//! A credential is supplied per request and only ever cached in memory.

use base64::prelude::*;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;

/// Seconds before `expires_at` at which a credential counts as expired
const EXPIRY_SKEW_SECONDS: i64 = 30;

/// Bearer credential with an optional refresh token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// The bearer access token
    pub access_token: String,
    /// Refresh token, when the source provides one
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential from an access token
    ///
    /// If the token is a JWT, its `exp` claim becomes `expires_at`.
    pub fn new(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let expires_at = jwt_expiry(&access_token);
        Self {
            access_token,
            refresh_token: None,
            expires_at,
        }
    }

    /// Attach a refresh token
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Override the expiry
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                Utc::now() + chrono::Duration::seconds(EXPIRY_SKEW_SECONDS) >= expires_at
            }
            None => false,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying it
fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let decoded = BASE64_URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| BASE64_STANDARD.decode(payload))
        .ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&decoded).ok()?;
    Utc.timestamp_opt(claim.exp?, 0).single()
}

#[cfg(test)]
mod type_tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let payload = BASE64_URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{exp}}}"#));
        format!("eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let credential = Credential::new("opaque-token");
        assert!(credential.expires_at.is_none());
        assert!(!credential.is_expired());
    }

    #[test]
    fn test_jwt_expiry_in_future() {
        let exp = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        let credential = Credential::new(jwt_with_exp(exp));
        assert_eq!(credential.expires_at.map(|t| t.timestamp()), Some(exp));
        assert!(!credential.is_expired());
    }

    #[test]
    fn test_jwt_expired() {
        let exp = (Utc::now() - chrono::Duration::seconds(100)).timestamp();
        assert!(Credential::new(jwt_with_exp(exp)).is_expired());
    }

    #[test]
    fn test_expiry_within_skew_counts_as_expired() {
        let credential = Credential::new("t")
            .with_expiry(Some(Utc::now() + chrono::Duration::seconds(10)));
        assert!(credential.is_expired());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let credential = Credential::new("secret-access").with_refresh_token("secret-refresh");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
