//! Once-per-browser product view counting.
//!
//! The count is bumped from the larger of the value the caller loaded and
//! the cached count, so a stale load does not roll the count back. Two first
//! views racing on the same listing can still overwrite each other and
//! under-count. Nothing retries or reconciles that.

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use usedmart_error::StorageResult;
use usedmart_models::{cache::UMBaseCache, enums::product::ProductStatus};

/// Remembers which browser has already viewed which listing.
#[async_trait]
pub trait ViewMarkerStore: Send + Sync {
    async fn has_marker(&self, key: &str) -> StorageResult<bool>;

    async fn put_marker(&self, key: &str) -> StorageResult<()>;

    /// Returns whether a marker was removed.
    async fn clear_marker(&self, key: &str) -> StorageResult<bool>;
}

/// Persists a new view count and refreshes any cached copy of it.
#[async_trait]
pub trait ViewCounter: Send + Sync {
    async fn store_view_count(&self, product_id: i32, count: i64) -> StorageResult<()>;

    /// Last count written through this counter, if it is still cached.
    async fn cached_view_count(&self, _product_id: i32) -> StorageResult<Option<i64>> {
        Ok(None)
    }
}

/// Markers kept in a named cache with a fixed TTL. The stored value is the
/// unix timestamp of the counted view.
pub struct CachedViewMarkers {
    cache: Arc<dyn UMBaseCache<Value = i64> + Send + Sync>,
    ttl: Duration,
}

impl CachedViewMarkers {
    pub fn new(cache: Arc<dyn UMBaseCache<Value = i64> + Send + Sync>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }
}

#[async_trait]
impl ViewMarkerStore for CachedViewMarkers {
    async fn has_marker(&self, key: &str) -> StorageResult<bool> {
        self.cache.exists(key.to_string()).await
    }

    async fn put_marker(&self, key: &str) -> StorageResult<()> {
        self.cache
            .set_with_ttl(key.to_string(), chrono::Utc::now().timestamp(), self.ttl)
            .await
    }

    async fn clear_marker(&self, key: &str) -> StorageResult<bool> {
        self.cache.delete(key.to_string()).await
    }
}

/// A detail view of one listing.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub product_id: i32,
    pub owner_id: i32,
    /// `None` for anonymous visitors.
    pub viewer_id: Option<i32>,
    pub status: ProductStatus,
    /// View count as loaded with the listing.
    pub current_count: i64,
    /// Browser identity from the visitor cookie.
    pub visitor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Owner,
    NotActive,
    AlreadyViewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Counted(i64),
    Skipped(SkipReason),
}

impl ViewOutcome {
    /// The count to show for a listing that was loaded with `loaded`.
    #[inline]
    pub fn visible_count(&self, loaded: i64) -> i64 {
        match self {
            ViewOutcome::Counted(n) => *n,
            ViewOutcome::Skipped(_) => loaded,
        }
    }
}

#[inline]
pub fn marker_key(visitor: &str, product_id: i32) -> String {
    format!("{visitor}:{product_id}")
}

#[derive(Clone)]
pub struct ViewGate {
    markers: Arc<dyn ViewMarkerStore>,
    counter: Arc<dyn ViewCounter>,
}

impl ViewGate {
    pub fn new(markers: Arc<dyn ViewMarkerStore>, counter: Arc<dyn ViewCounter>) -> Self {
        Self { markers, counter }
    }

    pub async fn record_view(&self, request: ViewRequest) -> StorageResult<ViewOutcome> {
        if request.viewer_id == Some(request.owner_id) {
            return Ok(ViewOutcome::Skipped(SkipReason::Owner));
        }
        if request.status != ProductStatus::Active {
            return Ok(ViewOutcome::Skipped(SkipReason::NotActive));
        }

        let key = marker_key(&request.visitor, request.product_id);
        if self.markers.has_marker(&key).await? {
            return Ok(ViewOutcome::Skipped(SkipReason::AlreadyViewed));
        }

        let cached = self.counter.cached_view_count(request.product_id).await?;
        let count = cached.map_or(request.current_count, |c| c.max(request.current_count)) + 1;
        self.counter
            .store_view_count(request.product_id, count)
            .await?;
        self.markers.put_marker(&key).await?;

        tracing::debug!(
            product_id = request.product_id,
            count,
            "Product view counted"
        );
        Ok(ViewOutcome::Counted(count))
    }

    pub async fn clear_marker(&self, visitor: &str, product_id: i32) -> StorageResult<bool> {
        self.markers
            .clear_marker(&marker_key(visitor, product_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::{HashMap, HashSet},
        sync::Mutex,
    };

    #[derive(Default)]
    struct MemoryMarkers(Mutex<HashSet<String>>);

    #[async_trait]
    impl ViewMarkerStore for MemoryMarkers {
        async fn has_marker(&self, key: &str) -> StorageResult<bool> {
            Ok(self.0.lock().unwrap().contains(key))
        }

        async fn put_marker(&self, key: &str) -> StorageResult<()> {
            self.0.lock().unwrap().insert(key.to_string());
            Ok(())
        }

        async fn clear_marker(&self, key: &str) -> StorageResult<bool> {
            Ok(self.0.lock().unwrap().remove(key))
        }
    }

    /// Records every write so tests can count increments.
    #[derive(Default)]
    struct MemoryCounter {
        counts: Mutex<HashMap<i32, i64>>,
        writes: Mutex<usize>,
    }

    #[async_trait]
    impl ViewCounter for MemoryCounter {
        async fn store_view_count(&self, product_id: i32, count: i64) -> StorageResult<()> {
            self.counts.lock().unwrap().insert(product_id, count);
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }

        async fn cached_view_count(&self, product_id: i32) -> StorageResult<Option<i64>> {
            Ok(self.counts.lock().unwrap().get(&product_id).copied())
        }
    }

    fn setup() -> (ViewGate, Arc<MemoryCounter>) {
        let counter = Arc::new(MemoryCounter::default());
        let gate = ViewGate::new(Arc::new(MemoryMarkers::default()), counter.clone());
        (gate, counter)
    }

    fn request(visitor: &str, current_count: i64) -> ViewRequest {
        ViewRequest {
            product_id: 42,
            owner_id: 7,
            viewer_id: None,
            status: ProductStatus::Active,
            current_count,
            visitor: visitor.into(),
        }
    }

    #[tokio::test]
    async fn test_second_view_from_same_browser_is_not_counted() {
        let (gate, counter) = setup();

        let first = gate.record_view(request("browser-a", 3)).await.unwrap();
        let second = gate.record_view(request("browser-a", 4)).await.unwrap();

        assert_eq!(first, ViewOutcome::Counted(4));
        assert_eq!(second, ViewOutcome::Skipped(SkipReason::AlreadyViewed));
        assert_eq!(*counter.writes.lock().unwrap(), 1);
        assert_eq!(counter.counts.lock().unwrap()[&42], 4);
    }

    #[tokio::test]
    async fn test_clearing_marker_allows_second_increment() {
        let (gate, counter) = setup();

        gate.record_view(request("browser-a", 0)).await.unwrap();
        assert!(gate.clear_marker("browser-a", 42).await.unwrap());
        let again = gate.record_view(request("browser-a", 1)).await.unwrap();

        assert_eq!(again, ViewOutcome::Counted(2));
        assert_eq!(*counter.writes.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_each_browser_counts_once() {
        let (gate, counter) = setup();

        gate.record_view(request("browser-a", 0)).await.unwrap();
        gate.record_view(request("browser-b", 1)).await.unwrap();

        assert_eq!(*counter.writes.lock().unwrap(), 2);
        assert_eq!(counter.counts.lock().unwrap()[&42], 2);
    }

    #[tokio::test]
    async fn test_stale_loaded_count_does_not_roll_back() {
        let (gate, counter) = setup();

        gate.record_view(request("browser-a", 5)).await.unwrap();
        // loaded before browser-a's view was stored
        let late = gate.record_view(request("browser-b", 5)).await.unwrap();

        assert_eq!(late, ViewOutcome::Counted(7));
        assert_eq!(counter.counts.lock().unwrap()[&42], 7);
    }

    #[tokio::test]
    async fn test_owner_and_inactive_views_are_skipped() {
        let (gate, counter) = setup();

        let mut own = request("browser-a", 0);
        own.viewer_id = Some(7);
        assert_eq!(
            gate.record_view(own).await.unwrap(),
            ViewOutcome::Skipped(SkipReason::Owner)
        );

        let mut pending = request("browser-a", 0);
        pending.status = ProductStatus::Pending;
        assert_eq!(
            gate.record_view(pending).await.unwrap(),
            ViewOutcome::Skipped(SkipReason::NotActive)
        );

        assert_eq!(*counter.writes.lock().unwrap(), 0);
        // skipped views leave no marker behind
        assert_eq!(
            gate.record_view(request("browser-a", 0)).await.unwrap(),
            ViewOutcome::Counted(1)
        );
    }

    #[test]
    fn test_visible_count() {
        assert_eq!(ViewOutcome::Counted(9).visible_count(8), 9);
        assert_eq!(
            ViewOutcome::Skipped(SkipReason::AlreadyViewed).visible_count(8),
            8
        );
    }
}
