//! Web Module
//!
//! Page fetching and the fetch-through URL cache.

mod fetcher;
mod url_cache;

pub use fetcher::{Fetcher, HttpFetcher};
pub use url_cache::{cached_key, count_key, UrlCache, DEFAULT_PAGE_TTL};
