use std::{sync::Arc, time::Duration};
use usedmart_core::view_gate::{
    CachedViewMarkers, ViewCounter, ViewGate, ViewOutcome, ViewRequest,
};
use usedmart_error::{storage::StorageError, StorageResult};
use usedmart_models::{
    cache::{UMBaseCache, UMCacheExt, UserGrant, USER_GRANT_CACHE_NAME, VIEW_MARKER_CACHE_NAME},
    enums::{common::Status, product::ProductStatus},
    settings::{CacheType, Settings},
    CacheProvider,
};
use usedmart_storage::{MokaCache, UMCacheProvider};

#[tokio::test]
async fn test_provider_registers_named_caches() {
    let provider = UMCacheProvider::init(&Settings::default()).await.unwrap();

    assert!(provider.get_cache::<UserGrant>(USER_GRANT_CACHE_NAME).is_ok());
    assert!(provider.get_cache::<i64>(VIEW_MARKER_CACHE_NAME).is_ok());
    // wrong value type
    assert!(provider.get_cache::<String>(VIEW_MARKER_CACHE_NAME).is_err());
    assert!(provider.get_cache::<i64>("Nope").is_err());
}

#[tokio::test]
async fn test_duplicate_cache_name_is_rejected() {
    let mut provider = UMCacheProvider::new("um", ":", CacheType::Moka);
    provider.create_cache::<i64>("Counts", None, None).unwrap();
    assert!(provider.create_cache::<i64>("Counts", None, None).is_err());
}

#[tokio::test]
async fn test_get_or_create_loads_once() {
    let cache = MokaCache::<UserGrant>::new("UserGrant".into(), "um:UserGrant".into(), None, None);
    let load = |key: String| async move {
        Ok(UserGrant {
            profile_id: key.parse().unwrap_or_default(),
            username: "alice".into(),
            status: Status::Enabled,
            role: None,
            permissions: vec![],
        })
    };

    let first = cache.get_or_create("3".into(), load).await.unwrap();
    assert_eq!(first.profile_id, 3);

    let second = cache
        .get_or_create("3".into(), |_| async { Err(StorageError::StorageUnavailable) })
        .await
        .unwrap();
    assert_eq!(second.username, "alice");
}

struct NoopCounter;

#[async_trait::async_trait]
impl ViewCounter for NoopCounter {
    async fn store_view_count(&self, _product_id: i32, _count: i64) -> StorageResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_view_gate_over_moka_markers() {
    let markers: Arc<dyn UMBaseCache<Value = i64> + Send + Sync> = Arc::new(MokaCache::<i64>::new(
        "ViewMarker".into(),
        "um:ViewMarker".into(),
        Some(1000),
        None,
    ));
    let gate = ViewGate::new(
        Arc::new(CachedViewMarkers::new(markers, Duration::from_secs(60))),
        Arc::new(NoopCounter),
    );
    let request = ViewRequest {
        product_id: 1,
        owner_id: 2,
        viewer_id: Some(3),
        status: ProductStatus::Active,
        current_count: 10,
        visitor: "v-1".into(),
    };

    assert_eq!(
        gate.record_view(request.clone()).await.unwrap(),
        ViewOutcome::Counted(11)
    );
    assert!(matches!(
        gate.record_view(request.clone()).await.unwrap(),
        ViewOutcome::Skipped(_)
    ));
    assert!(gate.clear_marker("v-1", 1).await.unwrap());
    assert_eq!(
        gate.record_view(request).await.unwrap(),
        ViewOutcome::Counted(11)
    );
}
