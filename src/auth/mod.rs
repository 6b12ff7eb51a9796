//! Authentication module
//!
//! Supports: static token, async callback, desktop app token file
//!
//! The `Authenticator` sits between the transport and a `TokenProvider`,
//! caching the current credential and coordinating refreshes after a 401.

mod authenticator;
mod provider;
mod types;

pub use authenticator::Authenticator;
pub use provider::{
    default_provider, parse_token_file, AuthGeneration, CallbackProvider, StaticToken,
    TokenFileProvider, TokenProvider,
};
pub use types::Credential;

#[cfg(test)]
mod tests;
