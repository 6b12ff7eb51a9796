//! Tests for pagination module

use super::*;
use crate::error::{Error, ErrorKind};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

type Seen = Arc<Mutex<Vec<Option<String>>>>;

/// Serves `pages` in order (an `Err` entry fails that fetch) and records
/// every cursor it was asked for
fn scripted(
    pages: Vec<std::result::Result<Page<&'static str>, Error>>,
) -> (impl PageFetcher<&'static str>, Seen) {
    let pages = Arc::new(pages);
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let fetcher = move |cursor: Option<String>| {
        let pages = pages.clone();
        let recorder = recorder.clone();
        async move {
            let index = {
                let mut seen = recorder.lock().unwrap();
                seen.push(cursor);
                seen.len() - 1
            };
            pages[index].clone()
        }
    };
    (fetcher, seen)
}

fn fetch_count(seen: &Seen) -> usize {
    seen.lock().unwrap().len()
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_page_empty_cursor_is_absent() {
    let page = Page::new(vec![1, 2], Some(String::new()));
    assert!(!page.has_more());
    assert_eq!(page.next_cursor, None);

    let page = Page::new(vec![1], Some("c1".to_string()));
    assert!(page.has_more());

    let page: Page<u8> = Page::terminal(vec![]);
    assert!(!page.has_more());
}

// ============================================================================
// Traversal Tests
// ============================================================================

#[tokio::test]
async fn test_two_pages_yield_all_items() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page::new(vec!["a", "b"], Some("c1".to_string()))),
        Ok(Page::terminal(vec!["c"])),
    ]);

    let items: Vec<&str> = paginate(fetcher).try_collect().await.unwrap();

    assert_eq!(items, vec!["a", "b", "c"]);
    assert_eq!(fetch_count(&seen), 2);
    // Cursor echoed verbatim
    assert_eq!(
        *seen.lock().unwrap(),
        vec![None, Some("c1".to_string())]
    );
}

#[tokio::test]
async fn test_empty_first_page() {
    let (fetcher, seen) = scripted(vec![Ok(Page::terminal(vec![]))]);

    let items: Vec<&str> = paginate(fetcher).try_collect().await.unwrap();

    assert!(items.is_empty());
    assert_eq!(fetch_count(&seen), 1);
}

#[tokio::test]
async fn test_no_fetch_until_polled() {
    let (fetcher, seen) = scripted(vec![Ok(Page::terminal(vec!["a"]))]);

    let stream = paginate(fetcher);
    assert_eq!(fetch_count(&seen), 0);
    drop(stream);
    assert_eq!(fetch_count(&seen), 0);
}

#[tokio::test]
async fn test_abandon_after_first_item() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page::new(vec!["a", "b"], Some("c1".to_string()))),
        Ok(Page::terminal(vec!["c"])),
    ]);

    let stream = paginate(fetcher);
    futures::pin_mut!(stream);
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first, "a");
    drop(stream);

    assert_eq!(fetch_count(&seen), 1);
}

#[tokio::test]
async fn test_second_page_fetched_only_when_first_drained() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page::new(vec!["a", "b"], Some("c1".to_string()))),
        Ok(Page::terminal(vec!["c"])),
    ]);

    let items: Vec<&str> = paginate(fetcher).take(2).try_collect().await.unwrap();

    assert_eq!(items, vec!["a", "b"]);
    assert_eq!(fetch_count(&seen), 1);
}

#[tokio::test]
async fn test_empty_middle_page_with_cursor_continues() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page::new(vec!["a"], Some("c1".to_string()))),
        Ok(Page::new(vec![], Some("c2".to_string()))),
        Ok(Page::terminal(vec!["b"])),
    ]);

    let items: Vec<&str> = paginate(fetcher).try_collect().await.unwrap();

    assert_eq!(items, vec!["a", "b"]);
    assert_eq!(fetch_count(&seen), 3);
}

#[tokio::test]
async fn test_empty_string_cursor_is_terminal() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page {
            items: vec!["a"],
            next_cursor: Some(String::new()),
        }),
        Ok(Page::terminal(vec!["never"])),
    ]);

    let items: Vec<&str> = paginate(fetcher).try_collect().await.unwrap();

    assert_eq!(items, vec!["a"]);
    assert_eq!(fetch_count(&seen), 1);
}

#[tokio::test]
async fn test_error_ends_stream() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page::new(vec!["a"], Some("c1".to_string()))),
        Err(Error::api(500, "boom")),
        Ok(Page::terminal(vec!["never"])),
    ]);

    let stream = paginate(fetcher);
    futures::pin_mut!(stream);

    assert_eq!(stream.next().await.unwrap().unwrap(), "a");
    let err = stream.next().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(stream.next().await.is_none());
    assert_eq!(fetch_count(&seen), 2);
}

#[tokio::test]
async fn test_each_traversal_starts_fresh() {
    let (fetcher, seen) = scripted(vec![
        Ok(Page::terminal(vec!["a"])),
        Ok(Page::terminal(vec!["b"])),
    ]);
    let fetcher = Arc::new(fetcher);

    let first: Vec<&str> = paginate(ArcFetcher(fetcher.clone()))
        .try_collect()
        .await
        .unwrap();
    let second: Vec<&str> = paginate(ArcFetcher(fetcher)).try_collect().await.unwrap();

    assert_eq!(first, vec!["a"]);
    assert_eq!(second, vec!["b"]);
    assert_eq!(*seen.lock().unwrap(), vec![None, None]);
}

/// Shares one fetcher between traversals
struct ArcFetcher<P>(Arc<P>);

#[async_trait::async_trait]
impl<P: PageFetcher<&'static str>> PageFetcher<&'static str> for ArcFetcher<P> {
    async fn fetch(&self, cursor: Option<String>) -> crate::Result<Page<&'static str>> {
        self.0.fetch(cursor).await
    }
}
