//! Lazy cursor traversal
//!
//! A traversal owns its session exclusively. No page is fetched until the
//! consumer polls for an item the buffer cannot supply, and dropping the
//! stream drops the session with it.

use super::types::{CursorState, PageFetcher};
use crate::error::Result;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::debug;

/// State of one traversal
struct PaginationSession<T, P> {
    fetcher: P,
    buffer: VecDeque<T>,
    cursor: CursorState,
    pages_fetched: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T, P> PaginationSession<T, P>
where
    T: Send,
    P: PageFetcher<T>,
{
    fn new(fetcher: P) -> Self {
        Self {
            fetcher,
            buffer: VecDeque::new(),
            cursor: CursorState::Initial,
            pages_fetched: 0,
            _item: PhantomData,
        }
    }

    /// Next item, fetching pages as needed; `None` once the terminal page
    /// is drained
    async fn next_item(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            let cursor = match std::mem::replace(&mut self.cursor, CursorState::Exhausted) {
                CursorState::Exhausted => return Ok(None),
                CursorState::Initial => None,
                CursorState::Next(cursor) => Some(cursor),
            };

            let page = self.fetcher.fetch(cursor).await?;
            self.pages_fetched += 1;
            debug!(
                page = self.pages_fetched,
                items = page.items.len(),
                has_more = page.has_more(),
                "Fetched page"
            );

            self.cursor = match page.next_cursor {
                Some(next) if !next.is_empty() => CursorState::Next(next),
                _ => CursorState::Exhausted,
            };
            self.buffer.extend(page.items);
        }
    }
}

/// Walk every page `fetcher` produces, yielding items in order
///
/// The first fetch uses no cursor; each following fetch echoes the previous
/// page's cursor verbatim. The stream ends after the page without a cursor,
/// or after the first error.
pub fn paginate<T, P>(fetcher: P) -> impl Stream<Item = Result<T>> + Send
where
    T: Send + 'static,
    P: PageFetcher<T> + 'static,
{
    stream::try_unfold(PaginationSession::new(fetcher), |mut session| async move {
        let next = session.next_item().await;
        next.map(|item| item.map(|item| (item, session)))
    })
}
