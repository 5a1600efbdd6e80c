mod grant;

use async_trait::async_trait;
use std::{future::Future, sync::Arc, time::Duration};
use usedmart_error::StorageResult;

pub use grant::UserGrant;

/// Role/permission snapshot per profile id.
pub const USER_GRANT_CACHE_NAME: &str = "UserGrant";
/// Per-browser product view markers, keyed `{visitor}:{product}`.
pub const VIEW_MARKER_CACHE_NAME: &str = "ViewMarker";
/// Last known view count per product id.
pub const PRODUCT_VIEW_CACHE_NAME: &str = "ProductView";

/// Key/value cache with per-entry expiry.
#[async_trait]
pub trait UMBaseCache: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    fn name(&self) -> &str;

    async fn get(&self, key: String) -> StorageResult<Option<Self::Value>>;

    /// Insert or replace with the cache's default TTL.
    async fn set(&self, key: String, value: Self::Value) -> StorageResult<()>;

    /// Insert only when absent. Returns whether the value was written.
    async fn set_nx(&self, key: String, value: Self::Value) -> StorageResult<bool>;

    async fn set_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<()>;

    async fn set_nx_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<bool>;

    /// Returns whether a live entry was removed.
    async fn delete(&self, key: String) -> StorageResult<bool>;

    /// Drop every entry of this cache. Returns the number removed.
    async fn delete_all(&self) -> StorageResult<u64>;

    async fn delete_by_keys(&self, keys: Vec<String>) -> StorageResult<u64>;

    async fn exists(&self, key: String) -> StorageResult<bool>;
}

#[async_trait]
impl<T: UMBaseCache + ?Sized> UMBaseCache for Arc<T> {
    type Value = T::Value;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get(&self, key: String) -> StorageResult<Option<Self::Value>> {
        (**self).get(key).await
    }

    async fn set(&self, key: String, value: Self::Value) -> StorageResult<()> {
        (**self).set(key, value).await
    }

    async fn set_nx(&self, key: String, value: Self::Value) -> StorageResult<bool> {
        (**self).set_nx(key, value).await
    }

    async fn set_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<()> {
        (**self).set_with_ttl(key, value, ttl).await
    }

    async fn set_nx_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<bool> {
        (**self).set_nx_with_ttl(key, value, ttl).await
    }

    async fn delete(&self, key: String) -> StorageResult<bool> {
        (**self).delete(key).await
    }

    async fn delete_all(&self) -> StorageResult<u64> {
        (**self).delete_all().await
    }

    async fn delete_by_keys(&self, keys: Vec<String>) -> StorageResult<u64> {
        (**self).delete_by_keys(keys).await
    }

    async fn exists(&self, key: String) -> StorageResult<bool> {
        (**self).exists(key).await
    }
}

/// Read-through helpers.
#[async_trait]
pub trait UMCacheExt: UMBaseCache {
    async fn get_or_create<F, Fut>(&self, key: String, f: F) -> StorageResult<Self::Value>
    where
        F: FnOnce(String) -> Fut + Send + Sync,
        Fut: Future<Output = StorageResult<Self::Value>> + Send;

    async fn get_or_create_with_ttl<F, Fut>(
        &self,
        key: String,
        ttl: Duration,
        f: F,
    ) -> StorageResult<Self::Value>
    where
        F: FnOnce(String) -> Fut + Send + Sync,
        Fut: Future<Output = StorageResult<Self::Value>> + Send;
}

#[async_trait]
impl<T: UMBaseCache> UMCacheExt for T {
    async fn get_or_create<F, Fut>(&self, key: String, f: F) -> StorageResult<T::Value>
    where
        F: FnOnce(String) -> Fut + Send + Sync,
        Fut: Future<Output = StorageResult<T::Value>> + Send,
    {
        if let Some(value) = self.get(key.clone()).await? {
            return Ok(value);
        }
        let value = f(key.clone()).await?;
        self.set(key, value.clone()).await?;
        Ok(value)
    }

    async fn get_or_create_with_ttl<F, Fut>(
        &self,
        key: String,
        ttl: Duration,
        f: F,
    ) -> StorageResult<T::Value>
    where
        F: FnOnce(String) -> Fut + Send + Sync,
        Fut: Future<Output = StorageResult<T::Value>> + Send,
    {
        if let Some(value) = self.get(key.clone()).await? {
            return Ok(value);
        }
        let value = f(key.clone()).await?;
        self.set_with_ttl(key, value.clone(), ttl).await?;
        Ok(value)
    }
}
