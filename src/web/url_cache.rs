//! URL Page Cache
//!
//! Memoizes fetched pages for a short TTL and counts every access per URL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::SharedStore;
use crate::error::{CacheError, Result};
use crate::web::Fetcher;

/// How long a fetched page stays cached.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

/// Key of the cached body for `url`.
pub fn cached_key(url: &str) -> String {
    format!("cached:{}", url)
}

/// Key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

// == Url Cache ==
/// Fetch-through page cache.
///
/// Every `get_page` call increments the URL's access counter, which never
/// expires. Bodies are cached for `ttl`; an expired body is fetched again.
pub struct UrlCache<F> {
    store: SharedStore,
    fetcher: F,
    ttl: Duration,
    /// Per-URL locks serializing misses so a burst triggers one fetch
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<F: Fetcher> UrlCache<F> {
    // == Constructor ==
    /// Creates a page cache with the default 10 second TTL.
    pub fn new(store: SharedStore, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            ttl: DEFAULT_PAGE_TTL,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the page TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get Page ==
    /// Returns the body of `url`, from cache when fresh.
    ///
    /// A fetch failure is returned unchanged and nothing is cached; the
    /// access is still counted.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let cached = {
            let mut store = self.store.write().await;
            store.incr(&count_key(url))?;
            store.get(&cached_key(url))?
        };
        if let Some(body) = cached {
            debug!(url, "Page cache hit");
            return decode_body(body);
        }

        let slot = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.entry(url.to_string()).or_default().clone()
        };
        let guard = slot.lock().await;

        // Another caller may have filled the cache while we waited.
        let cached = self.store.read().await.get(&cached_key(url));
        let result = match cached {
            Ok(Some(body)) => {
                debug!(url, "Page cache filled by concurrent fetch");
                decode_body(body)
            }
            Ok(None) => self.fetch_and_cache(url).await,
            Err(e) => Err(e),
        };
        drop(guard);

        // Slots are cloned and released under the map lock, so a count of one
        // means nobody else is waiting on this URL.
        let mut in_flight = self.in_flight.lock().await;
        drop(slot);
        if in_flight
            .get(url)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            in_flight.remove(url);
        }

        result
    }

    async fn fetch_and_cache(&self, url: &str) -> Result<String> {
        debug!(url, "Page cache miss");
        let body = self.fetcher.fetch(url).await.inspect_err(|e| {
            warn!(url, error = %e, "Page fetch failed");
        })?;
        self.store
            .write()
            .await
            .set(cached_key(url), body.as_str(), Some(self.ttl));
        Ok(body)
    }

    // == Access Count ==
    /// Number of `get_page` calls made for `url`.
    pub async fn access_count(&self, url: &str) -> u64 {
        self.store.read().await.counter(&count_key(url))
    }
}

fn decode_body(body: Vec<u8>) -> Result<String> {
    String::from_utf8(body).map_err(|e| CacheError::Parse(format!("cached page is not UTF-8: {}", e)))
}
