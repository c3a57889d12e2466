use thiserror::Error;

/// Errors raised while fetching or parsing WordPress.org review pages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("connection failed: {url} returned {status}")]
    Connection { url: String, status: u16 },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("review {path} has no topic content block")]
    MissingContent { path: String },
    #[error("listing topic has no usable permalink: {href}")]
    InvalidPermalink { href: String },
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize message: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from a non-200 response.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
