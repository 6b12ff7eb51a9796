//! Tests for the auth module

use super::*;
use crate::error::{Error, ErrorKind};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out "token-N", bumping N on every call
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl TokenProvider for CountingProvider {
    async fn get_token(&self) -> crate::Result<Credential> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Credential::new(format!("token-{n}")))
    }
}

struct FailingProvider;

#[async_trait]
impl TokenProvider for FailingProvider {
    async fn get_token(&self) -> crate::Result<Credential> {
        Err(Error::config("keychain locked"))
    }
}

// ============================================================================
// Providers
// ============================================================================

#[tokio::test]
async fn test_static_token() {
    let provider = StaticToken::new("abc");
    let credential = provider.get_token().await.unwrap();
    assert_eq!(credential.access_token, "abc");

    // Repeated calls return the same value
    assert_eq!(provider.get_token().await.unwrap(), credential);
}

#[tokio::test]
async fn test_static_token_cannot_refresh() {
    let provider = StaticToken::new("abc");
    let err = provider.refresh(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_callback_provider() {
    let provider = CallbackProvider::new(|| async { Ok(Credential::new("from-callback")) });
    let credential = provider.get_token().await.unwrap();
    assert_eq!(credential.access_token, "from-callback");

    // Default refresh asks again
    let refreshed = provider.refresh(Some(&credential)).await.unwrap();
    assert_eq!(refreshed.access_token, "from-callback");
}

// ============================================================================
// Token File
// ============================================================================

#[test]
fn test_parse_cognito_tokens() {
    let contents = serde_json::json!({
        "cognito_tokens": serde_json::json!({
            "access_token": "fake_access_token",
            "refresh_token": "fake_refresh_token"
        })
        .to_string()
    })
    .to_string();

    let (generation, credential) = parse_token_file(&contents).unwrap();
    assert_eq!(generation, AuthGeneration::Cognito);
    assert_eq!(credential.access_token, "fake_access_token");
    assert_eq!(
        credential.refresh_token.as_deref(),
        Some("fake_refresh_token")
    );
}

#[test]
fn test_parse_workos_tokens_preferred() {
    let contents = serde_json::json!({
        "workos_tokens": {"accessToken": "new", "refreshToken": "new-refresh"},
        "cognito_tokens": "{\"access_token\": \"old\", \"refresh_token\": \"old-refresh\"}"
    })
    .to_string();

    let (generation, credential) = parse_token_file(&contents).unwrap();
    assert_eq!(generation, AuthGeneration::WorkOs);
    assert_eq!(credential.access_token, "new");
}

#[test]
fn test_parse_missing_entries() {
    let err = parse_token_file(r#"{"session": {}}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[test]
fn test_parse_empty_access_token() {
    let contents = serde_json::json!({
        "cognito_tokens": "{\"access_token\": \"\", \"refresh_token\": \"r\"}"
    })
    .to_string();
    let err = parse_token_file(&contents).unwrap_err();
    assert!(err.to_string().contains("Access or refresh token missing"));
}

#[test]
fn test_parse_corrupt_file() {
    let err = parse_token_file("not json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);

    let err = parse_token_file(r#"{"cognito_tokens": "{broken"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_token_file_provider_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supabase.json");
    std::fs::write(
        &path,
        serde_json::json!({
            "cognito_tokens": "{\"access_token\": \"a1\", \"refresh_token\": \"r1\"}"
        })
        .to_string(),
    )
    .unwrap();

    let provider = TokenFileProvider::new(&path);
    assert_eq!(provider.get_token().await.unwrap().access_token, "a1");

    // The desktop app rewrites the file; refresh picks up the new token
    std::fs::write(
        &path,
        serde_json::json!({
            "cognito_tokens": "{\"access_token\": \"a2\", \"refresh_token\": \"r2\"}"
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(provider.refresh(None).await.unwrap().access_token, "a2");
}

#[tokio::test]
async fn test_token_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TokenFileProvider::new(dir.path().join("missing.json"));

    let err = provider.get_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_string().contains("Token file not found"));
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
#[test]
fn test_no_default_provider_on_other_platforms() {
    assert!(TokenFileProvider::platform_default().is_none());
    assert!(default_provider().is_none());
}

// ============================================================================
// Authenticator
// ============================================================================

#[tokio::test]
async fn test_anonymous_authenticator() {
    let auth = Authenticator::anonymous();
    assert!(!auth.has_provider());
    assert!(auth.current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_anonymous_refresh_is_auth_error() {
    let auth = Authenticator::anonymous();
    let err = auth.refresh(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_authenticator_caches_credential() {
    let provider = Arc::new(CountingProvider::default());
    let auth = Authenticator::new(Some(provider.clone()));

    let first = auth.current().await.unwrap().unwrap();
    let second = auth.current().await.unwrap().unwrap();

    assert_eq!(first.access_token, "token-1");
    assert_eq!(second.access_token, "token-1");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_authenticator_refresh_replaces_cache() {
    let provider = Arc::new(CountingProvider::default());
    let auth = Authenticator::new(Some(provider.clone()));

    let stale = auth.current().await.unwrap().unwrap();
    let fresh = auth.refresh(Some(&stale)).await.unwrap();
    assert_eq!(fresh.access_token, "token-2");

    let current = auth.current().await.unwrap().unwrap();
    assert_eq!(current.access_token, "token-2");
}

#[tokio::test]
async fn test_concurrent_refresh_of_same_stale_token_calls_provider_once() {
    let provider = Arc::new(CountingProvider::default());
    let auth = Authenticator::new(Some(provider.clone()));

    let stale = auth.current().await.unwrap().unwrap();
    let a = auth.refresh(Some(&stale)).await.unwrap();
    let b = auth.refresh(Some(&stale)).await.unwrap();

    assert_eq!(a.access_token, "token-2");
    assert_eq!(b.access_token, "token-2");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_errors_become_auth() {
    let auth = Authenticator::new(Some(Arc::new(FailingProvider)));
    let err = auth.current().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_string().contains("keychain locked"));
}

#[tokio::test]
async fn test_clear_cache() {
    let provider = Arc::new(CountingProvider::default());
    let auth = Authenticator::new(Some(provider.clone()));

    auth.current().await.unwrap();
    auth.clear_cache().await;
    let credential = auth.current().await.unwrap().unwrap();

    assert_eq!(credential.access_token, "token-2");
}
