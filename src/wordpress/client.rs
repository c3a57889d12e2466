use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};

/// Plain HTTP/1.1 client for WordPress.org pages.
///
/// Requests carry no custom headers and no timeout; the origin is
/// configurable so tests can point it at a local server.
#[derive(Debug, Clone)]
pub struct WordpressClient {
    http: Client,
    base_url: String,
}

impl WordpressClient {
    /// Create a client for the given origin, e.g. `https://wordpress.org`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().http1_only().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` relative to the origin and return the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] for any status other than 200, or
    /// [`Error::Http`] if the request itself fails.
    pub async fn get_html(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Connection {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
