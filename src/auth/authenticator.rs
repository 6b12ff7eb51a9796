//! Authenticator implementation
//!
//! Caches the current credential in memory and coordinates refreshes so that
//! concurrent calls rejected with the same stale token trigger one provider
//! refresh, not one each.

use super::provider::TokenProvider;
use super::types::Credential;
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Supplies credentials to the transport
pub struct Authenticator {
    /// Where credentials come from; `None` means anonymous requests
    provider: Option<Arc<dyn TokenProvider>>,
    /// In-memory copy of the last credential handed out
    cached: RwLock<Option<Credential>>,
}

impl Authenticator {
    /// Create an authenticator backed by `provider`
    pub fn new(provider: Option<Arc<dyn TokenProvider>>) -> Self {
        Self {
            provider,
            cached: RwLock::new(None),
        }
    }

    /// An authenticator that never attaches a credential
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Whether a provider is configured
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Credential for the next attempt, or `None` when anonymous
    pub async fn current(&self) -> Result<Option<Credential>> {
        let Some(provider) = &self.provider else {
            return Ok(None);
        };

        {
            let cached = self.cached.read().await;
            if let Some(credential) = cached.as_ref() {
                if !credential.is_expired() {
                    return Ok(Some(credential.clone()));
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Another task may have filled the cache while we waited
        if let Some(credential) = cached.as_ref() {
            if !credential.is_expired() {
                return Ok(Some(credential.clone()));
            }
        }

        let fresh = provider.get_token().await.map_err(as_auth_error)?;
        *cached = Some(fresh.clone());
        Ok(Some(fresh))
    }

    /// Replace a credential the server rejected
    ///
    /// If the cache already holds a different, unexpired credential, another
    /// call refreshed first and that credential is returned as is.
    pub async fn refresh(&self, stale: Option<&Credential>) -> Result<Credential> {
        let Some(provider) = &self.provider else {
            return Err(Error::auth(
                "server requires authentication and no token provider is configured",
            ));
        };

        let mut cached = self.cached.write().await;

        if let (Some(current), Some(stale)) = (cached.as_ref(), stale) {
            if current.access_token != stale.access_token && !current.is_expired() {
                debug!("Credential already refreshed by a concurrent call");
                return Ok(current.clone());
            }
        }

        let fresh = provider.refresh(stale).await.map_err(as_auth_error)?;
        debug!("Credential refreshed");
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    /// Clear the cached credential (forces the next call to ask the provider)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached.write().await;
        *cached = None;
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("has_provider", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

/// Providers must fail with `Auth`; anything else is folded into it
fn as_auth_error(err: Error) -> Error {
    match err {
        Error::Auth { .. } => err,
        other => Error::auth(other.to_string()),
    }
}
