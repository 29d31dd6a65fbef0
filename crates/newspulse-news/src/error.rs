use thiserror::Error;

/// Failure to retrieve a page from the news feed.
///
/// Always fatal to the request that triggered it: the collector never skips a
/// failed page or falls through to the next query.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}
