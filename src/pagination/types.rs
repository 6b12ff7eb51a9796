//! Pagination types and traits
//!
//! Defines the page record and the fetch capability a traversal is built on.

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// One fetched page: items in server order plus an opaque continuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` marks the terminal page
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page; an empty cursor is treated as absent
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|cursor| !cursor.is_empty()),
        }
    }

    /// Create a terminal page
    pub fn terminal(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Check if another page follows this one
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Fetches one page given the cursor from the previous page (`None` first)
///
/// Implemented for any `Fn(Option<String>) -> impl Future<Output =
/// Result<Page<T>>>`, so endpoint glue can pass a closure.
#[async_trait]
pub trait PageFetcher<T: Send>: Send + Sync {
    async fn fetch(&self, cursor: Option<String>) -> Result<Page<T>>;
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for F
where
    T: Send + 'static,
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
{
    async fn fetch(&self, cursor: Option<String>) -> Result<Page<T>> {
        (self)(cursor).await
    }
}

/// Where a traversal stands between fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CursorState {
    /// Nothing fetched yet
    Initial,
    /// The last page returned this cursor
    Next(String),
    /// The terminal page has been fetched
    Exhausted,
}
