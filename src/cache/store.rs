//! Key-Value Store Module
//!
//! Main store engine: HashMap storage with TTL expiration, atomic counters
//! and append-only lists.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEntry, EntryData, Value};
use crate::error::{CacheError, Result};

// == Key-Value Store ==
/// In-memory key-value storage with lazy TTL expiration.
///
/// Expired entries are never returned and are treated as absent by every
/// operation; they are physically removed by `cleanup_expired`.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl KeyValueStore {
    // == Constructor ==
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the live entry for `key`, skipping expired ones.
    fn live(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    /// Drops `key` if it has expired so writers start from a clean slate.
    fn evict_if_expired(&mut self, key: &str) {
        if self.entries.get(key).is_some_and(CacheEntry::is_expired) {
            self.entries.remove(key);
        }
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and its TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live; `None` never expires
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>, ttl: Option<Duration>) {
        let data = EntryData::Scalar(value.into().to_bytes());
        self.entries.insert(key.into(), CacheEntry::new(data, ttl));
    }

    // == Get ==
    /// Retrieves the raw bytes stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is missing or expired.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.live(key).map(|entry| &entry.data) {
            Some(EntryData::Scalar(bytes)) => Ok(Some(bytes.clone())),
            Some(EntryData::List(_)) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    // == Increment ==
    /// Atomically adds one to the integer at `key` and returns the new value.
    ///
    /// A missing or expired key starts from zero. An existing TTL is kept.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        self.evict_if_expired(key);

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(EntryData::Scalar(b"0".to_vec()), None));

        let bytes = match &mut entry.data {
            EntryData::Scalar(bytes) => bytes,
            EntryData::List(_) => return Err(CacheError::WrongType(key.to_string())),
        };

        let current: i64 = std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| CacheError::NotAnInteger(key.to_string()))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Overflow(key.to_string()))?;

        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    // == Counter ==
    /// Reads the counter at `key`; zero when absent or not a counter.
    pub fn counter(&self, key: &str) -> u64 {
        match self.live(key).map(|entry| &entry.data) {
            Some(EntryData::Scalar(bytes)) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|text| text.parse().ok())
                .unwrap_or(0),
            _ => 0,
        }
    }

    // == Append ==
    /// Appends `item` to the list at `key`, creating it if absent.
    ///
    /// Returns the length of the list after the push.
    pub fn rpush(&mut self, key: &str, item: impl Into<String>) -> Result<usize> {
        self.evict_if_expired(key);

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(EntryData::List(Vec::new()), None));

        match &mut entry.data {
            EntryData::List(items) => {
                items.push(item.into());
                debug!(key, len = items.len(), "Appended list item");
                Ok(items.len())
            }
            EntryData::Scalar(_) => Err(CacheError::WrongType(key.to_string())),
        }
    }

    // == Range ==
    /// Returns the items of the list at `key` between `start` and `stop`.
    ///
    /// Both bounds are inclusive and negative indices count from the end,
    /// so `lrange(key, 0, -1)` returns the whole list. Out-of-range bounds
    /// are clamped and a missing key yields an empty list.
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let items = match self.live(key).map(|entry| &entry.data) {
            Some(EntryData::List(items)) => items,
            Some(EntryData::Scalar(_)) => return Err(CacheError::WrongType(key.to_string())),
            None => return Ok(Vec::new()),
        };

        let len = items.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

        if start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(items[start as usize..=stop as usize].to_vec())
    }

    // == List Length ==
    /// Returns the length of the list at `key`, zero when absent.
    pub fn llen(&self, key: &str) -> Result<usize> {
        match self.live(key).map(|entry| &entry.data) {
            Some(EntryData::List(items)) => Ok(items.len()),
            Some(EntryData::Scalar(_)) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(0),
        }
    }

    // == Flush ==
    /// Discards every entry.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_store_new() {
        let store = KeyValueStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = KeyValueStore::new();

        store.set("key1", "value1", None);

        assert_eq!(store.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = KeyValueStore::new();
        assert_eq!(store.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = KeyValueStore::new();

        store.set("key1", "value1", Some(Duration::from_millis(50)));
        store.set("key1", "value2", None);

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_numbers_are_stored_as_text() {
        let mut store = KeyValueStore::new();

        store.set("int", 42, None);
        store.set("float", 0.5, None);

        assert_eq!(store.get("int").unwrap(), Some(b"42".to_vec()));
        assert_eq!(store.get("float").unwrap(), Some(b"0.5".to_vec()));
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = KeyValueStore::new();

        store.set("key1", "value1", Some(Duration::from_millis(50)));
        assert!(store.get("key1").unwrap().is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1").unwrap(), None);
    }

    #[test]
    fn test_incr_starts_from_zero() {
        let mut store = KeyValueStore::new();

        assert_eq!(store.incr("counter").unwrap(), 1);
        assert_eq!(store.incr("counter").unwrap(), 2);
        assert_eq!(store.get("counter").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.counter("counter"), 2);
        assert_eq!(store.counter("missing"), 0);
    }

    #[test]
    fn test_incr_existing_integer() {
        let mut store = KeyValueStore::new();

        store.set("counter", 41, None);
        assert_eq!(store.incr("counter").unwrap(), 42);
    }

    #[test]
    fn test_incr_keeps_ttl() {
        let mut store = KeyValueStore::new();

        store.set("counter", 1, Some(Duration::from_millis(50)));
        assert_eq!(store.incr("counter").unwrap(), 2);

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("counter").unwrap(), None);
        assert_eq!(store.incr("counter").unwrap(), 1);
    }

    #[test]
    fn test_incr_not_an_integer() {
        let mut store = KeyValueStore::new();

        store.set("text", "hello", None);
        assert!(matches!(store.incr("text"), Err(CacheError::NotAnInteger(_))));
    }

    #[test]
    fn test_incr_overflow() {
        let mut store = KeyValueStore::new();

        store.set("max", i64::MAX, None);
        assert!(matches!(store.incr("max"), Err(CacheError::Overflow(_))));
    }

    #[test]
    fn test_rpush_and_lrange() {
        let mut store = KeyValueStore::new();

        assert_eq!(store.rpush("list", "a").unwrap(), 1);
        assert_eq!(store.rpush("list", "b").unwrap(), 2);
        assert_eq!(store.rpush("list", "c").unwrap(), 3);

        assert_eq!(store.lrange("list", 0, -1).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.lrange("list", 0, 0).unwrap(), vec!["a"]);
        assert_eq!(store.lrange("list", 1, 5).unwrap(), vec!["b", "c"]);
        assert_eq!(store.lrange("list", -2, -1).unwrap(), vec!["b", "c"]);
        assert_eq!(store.lrange("list", -10, 1).unwrap(), vec!["a", "b"]);
        assert!(store.lrange("list", 2, 1).unwrap().is_empty());
        assert!(store.lrange("list", 5, 10).unwrap().is_empty());
        assert_eq!(store.llen("list").unwrap(), 3);
    }

    #[test]
    fn test_lrange_missing_key() {
        let store = KeyValueStore::new();

        assert!(store.lrange("missing", 0, -1).unwrap().is_empty());
        assert_eq!(store.llen("missing").unwrap(), 0);
    }

    #[test]
    fn test_wrong_type_errors() {
        let mut store = KeyValueStore::new();

        store.set("scalar", "value", None);
        store.rpush("list", "item").unwrap();

        assert!(matches!(store.rpush("scalar", "x"), Err(CacheError::WrongType(_))));
        assert!(matches!(store.lrange("scalar", 0, -1), Err(CacheError::WrongType(_))));
        assert!(matches!(store.get("list"), Err(CacheError::WrongType(_))));
        assert!(matches!(store.incr("list"), Err(CacheError::WrongType(_))));
    }

    #[test]
    fn test_set_replaces_list() {
        let mut store = KeyValueStore::new();

        store.rpush("key", "item").unwrap();
        store.set("key", "scalar", None);

        assert_eq!(store.get("key").unwrap(), Some(b"scalar".to_vec()));
    }

    #[test]
    fn test_store_flush() {
        let mut store = KeyValueStore::new();

        store.set("key1", "value1", None);
        store.incr("counter").unwrap();
        store.rpush("list", "item").unwrap();
        store.flush();

        assert!(store.is_empty());
        assert_eq!(store.get("key1").unwrap(), None);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = KeyValueStore::new();

        store.set("key1", "value1", Some(Duration::from_millis(50)));
        store.set("key2", "value2", Some(Duration::from_secs(10)));
        store.set("key3", "value3", None);

        sleep(Duration::from_millis(80));

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);
        assert!(store.get("key2").unwrap().is_some());
    }
}
