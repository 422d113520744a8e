//! Cache Module
//!
//! Provides the in-memory key-value store with TTL expiration, atomic
//! counters and append-only lists.

mod entry;
mod store;
mod value;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, EntryData};
pub use store::KeyValueStore;
pub use value::Value;

/// Store handle shared by every component.
///
/// Each store operation runs under a single lock acquisition, which makes
/// `incr` and `rpush` atomic with respect to concurrent callers.
pub type SharedStore = Arc<RwLock<KeyValueStore>>;

/// Wraps a store into a shareable handle.
pub fn shared(store: KeyValueStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}
