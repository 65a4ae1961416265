use async_trait::async_trait;
use jiff::Timestamp;
use std::collections::HashMap;
use tokio::sync::Mutex;
use waypoint_core::error::{StoreError, StoreResult};
use waypoint_core::{LinkRecord, LinkStore};

/// Key under which the full link collection is persisted.
const LINKS_KEY: &str = "waypoint:links";

/// Abstract key-value persistence contract consumed by [`KvStore`].
///
/// Access is synchronous and local; there is no transaction support, so
/// read-modify-write consistency is the caller's responsibility.
pub trait KeyValue: Send + Sync + 'static {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Removes `key`. Returns `true` if a value existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;
}

// Shared handles to a backend are backends too, so several stores (or a
// store rebuilt after restart) can point at the same underlying data.
impl<K: KeyValue> KeyValue for std::sync::Arc<K> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }
}

/// In-memory [`KeyValue`] backend, for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: std::sync::Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(entries.remove(key).is_some())
    }
}

/// [`LinkStore`] that snapshots the whole collection as one JSON document
/// in a [`KeyValue`] backend.
///
/// Each operation is a full read-modify-write of the document, serialized
/// through an internal mutex since the backend offers no transactions.
/// Suited to the small collections this registry manages, not to large
/// ones.
#[derive(Debug)]
pub struct KvStore<K> {
    kv: Mutex<K>,
}

impl<K: KeyValue> KvStore<K> {
    /// Creates a store over the given key-value backend.
    pub fn new(kv: K) -> Self {
        Self { kv: Mutex::new(kv) }
    }

    fn load(kv: &K) -> StoreResult<Vec<LinkRecord>> {
        match kv.get(LINKS_KEY)? {
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    fn save(kv: &K, links: &[LinkRecord]) -> StoreResult<()> {
        let bytes =
            serde_json::to_vec(links).map_err(|e| StoreError::Serialization(e.to_string()))?;
        kv.put(LINKS_KEY, bytes)
    }
}

#[async_trait]
impl<K: KeyValue> LinkStore for KvStore<K> {
    async fn prune(&self, now: Timestamp) -> StoreResult<usize> {
        let kv = self.kv.lock().await;
        let mut links = Self::load(&kv)?;
        let before = links.len();
        links.retain(|record| !record.is_expired(now));
        let dropped = before - links.len();
        if dropped > 0 {
            Self::save(&kv, &links)?;
        }
        Ok(dropped)
    }

    async fn exists(&self, code: &str) -> StoreResult<bool> {
        let kv = self.kv.lock().await;
        let links = Self::load(&kv)?;
        Ok(links.iter().any(|record| record.code.as_str() == code))
    }

    async fn insert(&self, record: LinkRecord) -> StoreResult<()> {
        let kv = self.kv.lock().await;
        let mut links = Self::load(&kv)?;
        if links.iter().any(|r| r.code == record.code) {
            return Err(StoreError::Conflict(record.code.to_string()));
        }
        links.insert(0, record);
        Self::save(&kv, &links)
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        let kv = self.kv.lock().await;
        let links = Self::load(&kv)?;
        Ok(links.into_iter().find(|record| record.code.as_str() == code))
    }

    async fn record_visit(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        let kv = self.kv.lock().await;
        let mut links = Self::load(&kv)?;
        let Some(record) = links.iter_mut().find(|r| r.code.as_str() == code) else {
            return Ok(None);
        };
        record.visit_count += 1;
        let updated = record.clone();
        Self::save(&kv, &links)?;
        Ok(Some(updated))
    }

    async fn list_all(&self) -> StoreResult<Vec<LinkRecord>> {
        let kv = self.kv.lock().await;
        Self::load(&kv)
    }
}
