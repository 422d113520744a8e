//! Tracked Cache - An in-process expiring key-value store
//!
//! Provides TTL expiration, atomic counters, call counting and history for
//! instrumented operations, call replay, and a fetch-through URL page cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod tracking;
pub mod web;

pub use cache::{shared, KeyValueStore, SharedStore, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
pub use tracking::{replay, Cache, Replay};
pub use web::{Fetcher, HttpFetcher, UrlCache};
