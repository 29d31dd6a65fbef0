//! News feed sources.

mod google_news;
mod rss;

use std::future::Future;

pub use google_news::GoogleNewsFeed;
pub use rss::{parse_feed, strip_html};

use crate::error::FetchError;

/// A syndication feed that can be searched page by page.
///
/// Implementations return the raw feed document; parsing and filtering happen
/// in [`crate::fetcher::fetch_page`].
pub trait FeedSource: Send + Sync {
    /// Fetch up to `count` items for `query`, starting at item `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or a non-success status.
    fn fetch_document(
        &self,
        query: &str,
        offset: usize,
        count: usize,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}
