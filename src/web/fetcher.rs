//! Page Fetchers
//!
//! The fetch capability behind `UrlCache`, with a reqwest-backed
//! implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};

/// Retrieves the body of a page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns its body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}

// == HTTP Fetcher ==
/// Fetches pages over HTTP(S).
///
/// The body is returned whatever the response status, only transport
/// failures are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::fetch("<client>", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::fetch(url, e))?;
        debug!(url, status = %response.status(), "Fetched page");
        response.text().await.map_err(|e| CacheError::fetch(url, e))
    }
}
