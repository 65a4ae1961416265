use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use waypoint_core::error::{StoreError, StoreResult};
use waypoint_core::{LinkRecord, LinkStore};

/// In-memory implementation of the [`LinkStore`] contract.
///
/// The collection is an ordered `Vec` rather than a map because the
/// presentation contract wants a newest-first snapshot: every insert
/// prepends, so iteration order is already the display order. A `Vec`
/// scan is fine at the scale this store is built for (batches of five).
#[derive(Debug, Default)]
pub struct MemoryStore {
    links: RwLock<Vec<LinkRecord>>,
}

impl MemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn prune(&self, now: Timestamp) -> StoreResult<usize> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|record| !record.is_expired(now));
        Ok(before - links.len())
    }

    async fn exists(&self, code: &str) -> StoreResult<bool> {
        let links = self.links.read().await;
        Ok(links.iter().any(|record| record.code.as_str() == code))
    }

    async fn insert(&self, record: LinkRecord) -> StoreResult<()> {
        let mut links = self.links.write().await;
        if links.iter().any(|r| r.code == record.code) {
            return Err(StoreError::Conflict(record.code.to_string()));
        }
        links.insert(0, record);
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .find(|record| record.code.as_str() == code)
            .cloned())
    }

    async fn record_visit(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        let mut links = self.links.write().await;
        let Some(record) = links.iter_mut().find(|r| r.code.as_str() == code) else {
            return Ok(None);
        };
        record.visit_count += 1;
        Ok(Some(record.clone()))
    }

    async fn list_all(&self) -> StoreResult<Vec<LinkRecord>> {
        let links = self.links.read().await;
        Ok(links.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use waypoint_core::ShortCode;

    fn record(code: &str, url: &str, expires_at: Timestamp) -> LinkRecord {
        LinkRecord {
            code: ShortCode::new_unchecked(code),
            original_url: url.to_string(),
            created_at: expires_at - SignedDuration::from_mins(30),
            expires_at,
            visit_count: 0,
        }
    }

    fn live(code: &str, url: &str) -> LinkRecord {
        record(code, url, Timestamp::now() + SignedDuration::from_hours(1))
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = MemoryStore::new();

        store.insert(live("abc123", "https://example.com")).await.unwrap();

        let found = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found.original_url, "https://example.com");
        assert_eq!(found.visit_count, 0);
    }

    #[tokio::test]
    async fn find_nonexistent() {
        let store = MemoryStore::new();
        assert!(store.find_by_code("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_conflict() {
        let store = MemoryStore::new();

        store.insert(live("abc123", "https://example.com")).await.unwrap();
        let err = store
            .insert(live("abc123", "https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn exists_checks() {
        let store = MemoryStore::new();

        assert!(!store.exists("abc123").await.unwrap());
        store.insert(live("abc123", "https://example.com")).await.unwrap();
        assert!(store.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn prune_drops_expired_only() {
        let store = MemoryStore::new();
        let now = Timestamp::now();

        store
            .insert(record("dead01", "https://old.com", now - SignedDuration::from_secs(1)))
            .await
            .unwrap();
        store
            .insert(record("alive1", "https://new.com", now + SignedDuration::from_hours(1)))
            .await
            .unwrap();

        let dropped = store.prune(now).await.unwrap();
        assert_eq!(dropped, 1);
        assert!(!store.exists("dead01").await.unwrap());
        assert!(store.exists("alive1").await.unwrap());
    }

    #[tokio::test]
    async fn prune_is_idempotent() {
        let store = MemoryStore::new();
        let now = Timestamp::now();

        store
            .insert(record("dead01", "https://old.com", now))
            .await
            .unwrap();

        assert_eq!(store.prune(now).await.unwrap(), 1);
        assert_eq!(store.prune(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn prune_treats_deadline_as_expired() {
        let store = MemoryStore::new();
        let now = Timestamp::now();

        store.insert(record("edge01", "https://edge.com", now)).await.unwrap();

        assert_eq!(store.prune(now).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn record_visit_increments() {
        let store = MemoryStore::new();

        store.insert(live("abc123", "https://example.com")).await.unwrap();

        let first = store.record_visit("abc123").await.unwrap().unwrap();
        assert_eq!(first.visit_count, 1);

        let second = store.record_visit("abc123").await.unwrap().unwrap();
        assert_eq!(second.visit_count, 2);
    }

    #[tokio::test]
    async fn record_visit_on_missing_code() {
        let store = MemoryStore::new();
        assert!(store.record_visit("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let store = MemoryStore::new();

        store.insert(live("first1", "https://a.com")).await.unwrap();
        store.insert(live("second", "https://b.com")).await.unwrap();
        store.insert(live("third1", "https://c.com")).await.unwrap();

        let all = store.list_all().await.unwrap();
        let codes: Vec<&str> = all.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["third1", "second", "first1"]);
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(live(&format!("code-{:03}", i), &format!("https://example{}.com", i)))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let found = store
                .find_by_code(&format!("code-{:03}", i))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(found.original_url, format!("https://example{}.com", i));
        }
    }
}
