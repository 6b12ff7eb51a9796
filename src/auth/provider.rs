//! Token providers
//!
//! A [`TokenProvider`] supplies bearer credentials on demand. The client only
//! talks to this trait; where the token comes from (a fixed string, an
//! application callback, the desktop app's token file) is chosen when the
//! client is built.

use super::types::Credential;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Source of bearer credentials
///
/// Implementations may suspend (file or network I/O) and must fail only with
/// [`Error::Auth`].
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the current credential
    async fn get_token(&self) -> Result<Credential>;

    /// Produce a replacement for a credential the server rejected
    ///
    /// The default asks for the current token again, which is correct for
    /// sources that are refreshed out of band.
    async fn refresh(&self, _stale: Option<&Credential>) -> Result<Credential> {
        self.get_token().await
    }
}

// ============================================================================
// Static Token
// ============================================================================

/// A fixed token supplied by the caller
#[derive(Clone)]
pub struct StaticToken {
    credential: Credential,
}

impl StaticToken {
    /// Create a provider for a fixed token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(token),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn get_token(&self) -> Result<Credential> {
        Ok(self.credential.clone())
    }

    async fn refresh(&self, _stale: Option<&Credential>) -> Result<Credential> {
        Err(Error::auth("static token was rejected and cannot be refreshed"))
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

// ============================================================================
// Callback Provider
// ============================================================================

/// Wraps an async closure as a token provider
pub struct CallbackProvider<F> {
    callback: F,
}

impl<F, Fut> CallbackProvider<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Credential>> + Send,
{
    /// Create a provider that calls `callback` for every token request
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F, Fut> TokenProvider for CallbackProvider<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Credential>> + Send,
{
    async fn get_token(&self) -> Result<Credential> {
        (self.callback)().await
    }
}

// ============================================================================
// Desktop Token File
// ============================================================================

/// Auth generation found in the desktop app's token file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGeneration {
    /// Current `workos_tokens` entry
    WorkOs,
    /// Legacy `cognito_tokens` entry
    Cognito,
}

impl AuthGeneration {
    fn key(self) -> &'static str {
        match self {
            AuthGeneration::WorkOs => "workos_tokens",
            AuthGeneration::Cognito => "cognito_tokens",
        }
    }
}

/// Root of `supabase.json`
#[derive(Debug, Deserialize)]
struct TokenFile {
    workos_tokens: Option<Value>,
    cognito_tokens: Option<Value>,
}

/// Token pair stored under either generation key
#[derive(Debug, Deserialize)]
struct StoredTokens {
    #[serde(alias = "accessToken")]
    access_token: Option<String>,
    #[serde(alias = "refreshToken")]
    refresh_token: Option<String>,
}

/// Reads the desktop app's `supabase.json`
///
/// The desktop app keeps this file current, so a refresh simply reads it
/// again.
#[derive(Debug, Clone)]
pub struct TokenFileProvider {
    path: PathBuf,
}

impl TokenFileProvider {
    /// Create a provider for an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider for this platform's token file location
    ///
    /// `~/Library/Application Support/Granola/supabase.json` on macOS and
    /// `%APPDATA%\Granola\supabase.json` on Windows. Other platforms have no
    /// desktop app and get `None`.
    pub fn platform_default() -> Option<Self> {
        if !cfg!(any(target_os = "macos", target_os = "windows")) {
            return None;
        }
        dirs::data_dir().map(|dir| Self::new(dir.join("Granola").join("supabase.json")))
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the token file
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn read_tokens(&self) -> Result<(AuthGeneration, Credential)> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::auth(format!(
                    "Token file not found: {}",
                    self.path.display()
                )));
            }
            Err(e) => {
                warn!(error = %e, "Failed to read token file");
                return Err(Error::auth(format!("Failed to read token file: {e}")));
            }
        };

        let parsed = parse_token_file(&contents)?;
        debug!(generation = ?parsed.0, "Read credential from token file");
        Ok(parsed)
    }
}

#[async_trait]
impl TokenProvider for TokenFileProvider {
    async fn get_token(&self) -> Result<Credential> {
        self.read_tokens().await.map(|(_, credential)| credential)
    }
}

/// Parse the contents of `supabase.json`
///
/// The newer `workos_tokens` entry wins over `cognito_tokens` when both are
/// present. Each entry is either a JSON-encoded string or an inline object.
pub fn parse_token_file(contents: &str) -> Result<(AuthGeneration, Credential)> {
    let file: TokenFile = serde_json::from_str(contents)
        .map_err(|e| Error::auth(format!("Failed to extract auth tokens: {e}")))?;

    let (generation, entry) = match (file.workos_tokens, file.cognito_tokens) {
        (Some(entry), _) if !entry.is_null() => (AuthGeneration::WorkOs, entry),
        (_, Some(entry)) if !entry.is_null() => (AuthGeneration::Cognito, entry),
        _ => {
            return Err(Error::auth(
                "Failed to extract auth tokens: no workos_tokens or cognito_tokens entry",
            ))
        }
    };

    let stored: StoredTokens = match entry {
        Value::String(encoded) => serde_json::from_str(&encoded),
        other => serde_json::from_value(other),
    }
    .map_err(|e| {
        Error::auth(format!(
            "Failed to extract auth tokens from {}: {e}",
            generation.key()
        ))
    })?;

    match (stored.access_token, stored.refresh_token) {
        (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
            Ok((generation, Credential::new(access).with_refresh_token(refresh)))
        }
        _ => Err(Error::auth("Access or refresh token missing.")),
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Pick the token provider for the running platform
///
/// Returns `None` where automatic retrieval is unsupported; requests then go
/// out unauthenticated and the server decides.
pub fn default_provider() -> Option<Arc<dyn TokenProvider>> {
    match TokenFileProvider::platform_default() {
        Some(provider) => {
            debug!(path = %provider.path().display(), "Using desktop token file");
            Some(Arc::new(provider))
        }
        None => {
            warn!("Automatic token retrieval is only supported on macOS and Windows. Provide a token manually.");
            None
        }
    }
}
