use async_trait::async_trait;
use moka::{
    future::{Cache as MokaInner, CacheBuilder},
    Expiry,
};
use std::time::{Duration, Instant};
use usedmart_error::{storage::CacheError, StorageResult};
use usedmart_models::cache::UMBaseCache;

/// A cached value with its own optional TTL.
#[derive(Clone)]
pub struct CacheItem<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub value: V,
    /// Overrides the cache-wide TTL when set.
    pub ttl: Option<Duration>,
}

/// In-process cache backed by `moka`.
pub struct MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    name: String,
    prefix: String,
    inner: MokaInner<String, CacheItem<V>>,
}

pub struct MokaExpiry {
    ttl: Option<Duration>,
}

impl MokaExpiry {
    #[inline]
    fn ttl_of<V: Clone + Send + Sync + 'static>(&self, item: &CacheItem<V>) -> Option<Duration> {
        item.ttl.or(self.ttl)
    }
}

impl<K, V> Expiry<K, CacheItem<V>> for MokaExpiry
where
    V: Clone + Send + Sync + 'static,
{
    fn expire_after_create(&self, _key: &K, item: &CacheItem<V>, _: Instant) -> Option<Duration> {
        self.ttl_of(item)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        item: &CacheItem<V>,
        _: Instant,
        _current: Option<Duration>,
    ) -> Option<Duration> {
        self.ttl_of(item)
    }
}

impl<V> MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(
        name: String,
        prefix: String,
        max_capacity: Option<u64>,
        ttl: Option<Duration>,
    ) -> Self {
        let mut builder = CacheBuilder::default().expire_after(MokaExpiry { ttl });
        if let Some(max_capacity) = max_capacity {
            builder = builder.max_capacity(max_capacity);
        }

        Self {
            name,
            prefix,
            inner: builder.build(),
        }
    }

    #[inline]
    fn get_full_key(&self, key: String) -> String {
        if self.prefix.is_empty() {
            key
        } else {
            format!("{}:{key}", self.prefix)
        }
    }

    #[inline]
    fn check_ttl(ttl: Duration) -> StorageResult<()> {
        if ttl.is_zero() {
            return Err(CacheError::TTLExpired("ttl must be > 0".into()).into());
        }
        Ok(())
    }

    async fn insert(&self, full_key: String, value: V, ttl: Option<Duration>) {
        self.inner.insert(full_key, CacheItem { value, ttl }).await;
    }
}

#[async_trait]
impl<V> UMBaseCache for MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    type Value = V;

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    async fn get(&self, key: String) -> StorageResult<Option<Self::Value>> {
        let full_key = self.get_full_key(key);
        Ok(self.inner.get(&full_key).await.map(|item| item.value))
    }

    #[inline]
    async fn set(&self, key: String, value: Self::Value) -> StorageResult<()> {
        self.insert(self.get_full_key(key), value, None).await;
        Ok(())
    }

    /// Best effort, not atomic.
    #[inline]
    async fn set_nx(&self, key: String, value: Self::Value) -> StorageResult<bool> {
        let full_key = self.get_full_key(key);
        if self.inner.contains_key(&full_key) {
            return Ok(false);
        }
        self.insert(full_key, value, None).await;
        Ok(true)
    }

    #[inline]
    async fn set_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<()> {
        Self::check_ttl(ttl)?;
        self.insert(self.get_full_key(key), value, Some(ttl)).await;
        Ok(())
    }

    #[inline]
    async fn set_nx_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<bool> {
        Self::check_ttl(ttl)?;
        let full_key = self.get_full_key(key);
        if self.inner.contains_key(&full_key) {
            return Ok(false);
        }
        self.insert(full_key, value, Some(ttl)).await;
        Ok(true)
    }

    #[inline]
    async fn delete(&self, key: String) -> StorageResult<bool> {
        let full_key = self.get_full_key(key);
        Ok(self.inner.remove(&full_key).await.is_some())
    }

    #[inline]
    async fn delete_all(&self) -> StorageResult<u64> {
        self.inner.run_pending_tasks().await;
        let count = self.inner.entry_count();
        self.inner.invalidate_all();
        Ok(count)
    }

    #[inline]
    async fn delete_by_keys(&self, keys: Vec<String>) -> StorageResult<u64> {
        let mut deleted = 0;
        for key in keys {
            if self.delete(key).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    #[inline]
    async fn exists(&self, key: String) -> StorageResult<bool> {
        let full_key = self.get_full_key(key);
        Ok(self.inner.contains_key(&full_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MokaCache<i64> {
        MokaCache::new("Test".into(), "um:Test".into(), Some(100), None)
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = cache();
        cache.set("a".into(), 1).await.unwrap();
        assert_eq!(cache.get("a".into()).await.unwrap(), Some(1));
        assert!(cache.exists("a".into()).await.unwrap());
        assert!(cache.delete("a".into()).await.unwrap());
        assert!(!cache.delete("a".into()).await.unwrap());
        assert_eq!(cache.get("a".into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_nx_keeps_first_value() {
        let cache = cache();
        assert!(cache.set_nx("k".into(), 1).await.unwrap());
        assert!(!cache.set_nx("k".into(), 2).await.unwrap());
        assert_eq!(cache.get("k".into()).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_rejected() {
        let cache = cache();
        assert!(cache
            .set_with_ttl("k".into(), 1, Duration::ZERO)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = cache();
        cache
            .set_with_ttl("k".into(), 1, Duration::from_millis(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.get("k".into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_by_keys_counts_hits() {
        let cache = cache();
        cache.set("a".into(), 1).await.unwrap();
        cache.set("b".into(), 2).await.unwrap();
        let deleted = cache
            .delete_by_keys(vec!["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
    }
}
