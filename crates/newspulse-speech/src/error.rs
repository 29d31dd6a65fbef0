use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the translation and speech clients.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {service}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    /// The service answered but the body did not have the expected shape.
    #[error("malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("text is {len} characters; the limit is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("nothing to synthesize: text is empty")]
    EmptyText,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Errors from writing or reading spooled audio files.
#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("failed to write audio to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read audio from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
