// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Granola Client
//!
//! An async client for the Granola document API.
//!
//! ## Features
//!
//! - **Credentials**: Static token, async callback, or the desktop app's token file
//! - **Bounded Retries**: Backoff with retry-after hints and one refresh on 401
//! - **Typed Errors**: Every failure lands in a closed taxonomy
//! - **Shape-aware Decoding**: Object and bare-array responses, strict on required fields
//! - **Lazy Pagination**: Cursor-paginated collections as a `Stream`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use granola_client::{GranolaClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Falls back to the desktop app's token file when no token is given
//!     let client = GranolaClient::new(None)?;
//!
//!     let people = client.get_people().await?;
//!
//!     let docs: Vec<_> = client.list_all_documents(None)?.try_collect().await?;
//!     for doc in &docs {
//!         println!("{}: {}", doc.id, doc.notes());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    GranolaClient (endpoints)                    │
//! │  call() → T    call_list() → Vec<T>    stream() → Stream<T>     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────────────┴───┬───────────┬─────────────────┐
//! │   Auth   │        HTTP           │  Decode   │    Paginate     │
//! ├──────────┼───────────────────────┼───────────┼─────────────────┤
//! │ Static   │ Transport + identity  │ Object    │ Cursor stream   │
//! │ Callback │ Retry / 401 refresh   │ BareArray │ Lazy fetch      │
//! │ TokenFile│ Rate Limit / Deadline │ Validation│                 │
//! └──────────┴───────────────────────┴───────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy
pub mod error;

/// Common types and type aliases
pub mod types;

/// Token providers and credential caching
pub mod auth;

/// HTTP transport with retry, refresh and rate limiting
pub mod http;

/// Response decoders (object, bare array)
pub mod decode;

/// Lazy cursor pagination
pub mod pagination;

/// Client options
pub mod options;

/// API records
pub mod models;

/// ProseMirror notes to Markdown
pub mod markdown;

/// Call surface
pub mod client;

mod endpoints;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{Credential, TokenProvider};
pub use client::{GranolaClient, GranolaClientBuilder};
pub use http::RequestSpec;
pub use options::ClientOptions;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
