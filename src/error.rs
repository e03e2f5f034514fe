//! Error types shared by the data providers.

use thiserror::Error;

/// Failure while fetching a page of rows from a data source.
///
/// Surfaced to the screen, which offers a retry; the windowing engine is
/// unaffected because it only works on already-fetched rows.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {status} body={body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("backend not configured: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl FetchError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::InvalidResponse(_) | FetchError::UnknownTable(_) | FetchError::Config(_) => false,
        }
    }
}
