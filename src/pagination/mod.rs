//! Pagination module
//!
//! Walks cursor-paginated collections as a lazy stream.
//!
//! # Overview
//!
//! A [`PageFetcher`] turns an optional cursor into a [`Page`]. [`paginate`]
//! drives it: fetch with no cursor, yield the items, follow `next_cursor`
//! until a page arrives without one. Cursor presence is the only
//! continuation signal, so a page may be empty and still have a successor.

mod stream;
mod types;

pub use stream::paginate;
pub use types::{Page, PageFetcher};

#[cfg(test)]
mod tests;
