//! Instrumented Storage
//!
//! `Cache` stores values under generated keys through a counted, recorded
//! `store` operation and reads them back with optional conversion.

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{SharedStore, Value};
use crate::error::{CacheError, Result};
use crate::tracking::operation::{call_count, CallHistory, CountCalls, Operation};

/// Identifier of the instrumented store operation.
pub const STORE_OPERATION: &str = "store";

// == Store Data ==
/// Persists a value under a fresh random key and returns the key.
pub struct StoreData {
    store: SharedStore,
}

impl StoreData {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Operation for StoreData {
    type Input = Value;
    type Output = String;

    fn name(&self) -> &str {
        STORE_OPERATION
    }

    async fn call(&self, data: Value) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.write().await.set(key.clone(), data, None);
        debug!(key = %key, "Stored value");
        Ok(key)
    }
}

// == Cache ==
/// Instrumented storage front-end over a shared store.
pub struct Cache {
    store: SharedStore,
    store_op: CountCalls<CallHistory<StoreData>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store`, discarding everything it held.
    pub async fn new(store: SharedStore) -> Self {
        store.write().await.flush();
        info!("Cache initialized with an empty store");

        let store_op = CountCalls::new(
            CallHistory::new(StoreData::new(store.clone()), store.clone()),
            store.clone(),
        );
        Self { store, store_op }
    }

    /// Returns the shared store handle.
    pub fn store_handle(&self) -> &SharedStore {
        &self.store
    }

    // == Store ==
    /// Stores `data` under a new random key and returns the key.
    ///
    /// Each call increments the `store` counter and appends one entry to both
    /// the input and output histories.
    pub async fn store(&self, data: impl Into<Value>) -> Result<String> {
        self.store_op.call(data.into()).await
    }

    /// Number of times `store` has been called.
    pub async fn calls(&self) -> u64 {
        call_count(&self.store, STORE_OPERATION).await
    }

    // == Get ==
    /// Retrieves the raw bytes stored under `key`, `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.read().await.get(key)
    }

    /// Retrieves the value under `key` and converts it with `transform`.
    ///
    /// The transform only runs when a value is present.
    pub async fn get_with<T, F>(&self, key: &str, transform: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.get(key).await?.map(transform).transpose()
    }

    /// Retrieves the value under `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_text).await
    }

    /// Retrieves the value under `key` as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            let text = decode_text(raw)?;
            text.trim()
                .parse()
                .map_err(|e| CacheError::Parse(format!("{:?} is not an integer: {}", text, e)))
        })
        .await
    }
}

fn decode_text(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::Parse(format!("invalid UTF-8: {}", e)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{shared, KeyValueStore};
    use crate::tracking::operation::{inputs_key, outputs_key};

    async fn new_cache() -> Cache {
        Cache::new(shared(KeyValueStore::new())).await
    }

    #[tokio::test]
    async fn test_store_hello_scenario() {
        let cache = new_cache().await;

        let k1 = cache.store("hello").await.unwrap();

        assert_eq!(cache.get(&k1).await.unwrap(), Some(b"hello".to_vec()));
        assert_eq!(cache.calls().await, 1);

        let store = cache.store_handle().read().await;
        assert_eq!(
            store.lrange(&inputs_key(STORE_OPERATION), 0, -1).unwrap(),
            vec!["('hello',)"]
        );
        assert_eq!(
            store.lrange(&outputs_key(STORE_OPERATION), 0, -1).unwrap(),
            vec![k1]
        );
    }

    #[tokio::test]
    async fn test_store_generates_unique_keys() {
        let cache = new_cache().await;

        let k1 = cache.store("a").await.unwrap();
        let k2 = cache.store("a").await.unwrap();

        assert_ne!(k1, k2);
        assert!(Uuid::parse_str(&k1).is_ok());
    }

    #[tokio::test]
    async fn test_new_flushes_store() {
        let store = shared(KeyValueStore::new());
        store.write().await.set("stale", "value", None);

        let cache = Cache::new(store).await;

        assert_eq!(cache.get("stale").await.unwrap(), None);
        assert_eq!(cache.calls().await, 0);
    }

    #[tokio::test]
    async fn test_get_with_transform() {
        let cache = new_cache().await;
        let key = cache.store(vec![1u8, 2, 3]).await.unwrap();

        let len = cache.get_with(&key, |raw| Ok(raw.len())).await.unwrap();
        assert_eq!(len, Some(3));

        let missing = cache.get_with("missing", |raw| Ok(raw.len())).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_get_str() {
        let cache = new_cache().await;
        let key = cache.store("foo").await.unwrap();
        let bad = cache.store(vec![0xffu8, 0xfe]).await.unwrap();

        assert_eq!(cache.get_str(&key).await.unwrap(), Some("foo".to_string()));
        assert_eq!(cache.get_str("missing").await.unwrap(), None);
        assert!(matches!(cache.get_str(&bad).await, Err(CacheError::Parse(_))));
    }

    #[tokio::test]
    async fn test_get_int() {
        let cache = new_cache().await;
        let number = cache.store("42").await.unwrap();
        let stored_int = cache.store(-7).await.unwrap();
        let text = cache.store("forty-two").await.unwrap();

        assert_eq!(cache.get_int(&number).await.unwrap(), Some(42));
        assert_eq!(cache.get_int(&stored_int).await.unwrap(), Some(-7));
        assert_eq!(cache.get_int("missing").await.unwrap(), None);
        assert!(matches!(cache.get_int(&text).await, Err(CacheError::Parse(_))));
    }
}
