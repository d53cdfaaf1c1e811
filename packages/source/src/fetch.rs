//! Outbound HTTP for the review page.

use async_trait::async_trait;
use url::Url;

use crate::SourceError;

/// Fetches the body of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a single GET and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] on connection failures or non-2xx
    /// responses.
    async fn fetch(&self, url: &Url) -> Result<String, SourceError>;
}

/// [`PageFetcher`] backed by a shared [`reqwest::Client`] with transport
/// defaults (no custom headers, no retry).
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher that reuses an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        log::debug!("Downloaded {} bytes from {url}", body.len());

        Ok(body)
    }
}
