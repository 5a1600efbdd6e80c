use crate::validation::manager::ValidationManager;
use std::sync::Arc;
use usedmart_common::UMAppContext;
use usedmart_core::{view_gate::CachedViewMarkers, ViewGate};
use usedmart_error::{UMError, UMResult};
use usedmart_models::{
    cache::{PRODUCT_VIEW_CACHE_NAME, VIEW_MARKER_CACHE_NAME},
    CacheProvider,
};
use usedmart_repository::ProductViewCounter;
use usedmart_storage::UMCacheProvider;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<ValidationManager>,
    pub view_gate: ViewGate,
}

impl AppState {
    pub fn new(validator: Arc<ValidationManager>, view_gate: ViewGate) -> Self {
        Self {
            validator,
            view_gate,
        }
    }
}

/// Builds the view gate over the provider's marker and view-count caches.
pub(crate) async fn view_gate() -> UMResult<ViewGate> {
    let ctx = UMAppContext::instance().await?;
    let ttl = ctx.settings()?.cache.view_marker_ttl();
    let provider = ctx.cache_provider()?;
    let provider = provider
        .downcast_ref::<UMCacheProvider>()
        .ok_or(UMError::from("Cache provider not initialized"))?;

    let markers = provider
        .get_cache::<i64>(VIEW_MARKER_CACHE_NAME)
        .map_err(|e| UMError::from(e.to_string()))?;
    let counts = provider
        .get_cache::<i64>(PRODUCT_VIEW_CACHE_NAME)
        .map_err(|e| UMError::from(e.to_string()))?;

    Ok(ViewGate::new(
        Arc::new(CachedViewMarkers::new(markers, ttl)),
        Arc::new(ProductViewCounter::new(counts, None)),
    ))
}
