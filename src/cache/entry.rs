//! Cache Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

use std::time::Duration;

// == Entry Data ==
/// The data held under a key: a scalar byte string or an ordered list.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    /// Bytes written by `set` or `incr`
    Scalar(Vec<u8>),
    /// Items appended by `rpush`, in insertion order
    List(Vec<String>),
}

// == Cache Entry ==
/// Represents a single store entry with data and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored data
    pub data: EntryData,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    pub fn new(data: EntryData, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now.saturating_add(ttl.as_millis() as u64));

        Self {
            data,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Checks expiry against a given timestamp (Unix milliseconds).
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn scalar(value: &str) -> EntryData {
        EntryData::Scalar(value.as_bytes().to_vec())
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new(scalar("test_value"), None);

        assert_eq!(entry.data, scalar("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms().is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(scalar("test_value"), Some(Duration::from_secs(10)));

        assert!(!entry.is_expired());
        let remaining = entry.ttl_remaining_ms().unwrap();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(scalar("test_value"), Some(Duration::from_millis(50)));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), Some(0));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            data: scalar("test"),
            created_at: now,
            expires_at: Some(now),
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - 1));
    }
}
