//! Grant snapshots: the role and permission codes of a profile, cached per
//! profile id.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::debug;
use usedmart_common::UMAppContext;
use usedmart_error::{storage::StorageError, web::WebError, WebResult};
use usedmart_models::{
    cache::{UMBaseCache, UMCacheExt, UserGrant, USER_GRANT_CACHE_NAME},
    enums::common::Status,
    CacheProvider,
};
use usedmart_repository::{ProfileRepository, RoleRepository};
use usedmart_storage::UMCacheProvider;

type GrantCache = Arc<dyn UMBaseCache<Value = UserGrant> + Send + Sync>;

async fn grant_cache() -> WebResult<GrantCache> {
    let ctx = UMAppContext::instance().await?;
    let provider = ctx.cache_provider()?;
    provider
        .downcast_ref::<UMCacheProvider>()
        .ok_or(WebError::InternalError(
            "Cache provider not initialized".to_string(),
        ))?
        .get_cache::<UserGrant>(USER_GRANT_CACHE_NAME)
        .map_err(|e| StorageError::CacheKind(e).into())
}

/// Loads the grant of `profile_id`, reading through the grant cache.
pub(crate) async fn load_grant(profile_id: i32) -> WebResult<UserGrant> {
    let ttl = UMAppContext::instance().await?.settings()?.cache.grant_ttl();
    let cache = grant_cache().await?;
    let grant = cache
        .get_or_create_with_ttl(profile_id.to_string(), ttl, |_| async move {
            let profile = ProfileRepository::find_by_id(profile_id, None::<&DatabaseConnection>)
                .await?
                .ok_or(StorageError::EntityNotFound(format!("profile {profile_id}")))?;

            // A disabled role grants nothing.
            let role = match profile.role_id {
                Some(role_id) => RoleRepository::find_by_id(role_id, None::<&DatabaseConnection>)
                    .await?
                    .filter(|role| role.status == Status::Enabled),
                None => None,
            };
            let (role, permissions) = match role {
                Some(role) => RoleRepository::find_grant(role.id, None::<&DatabaseConnection>)
                    .await?
                    .map(|(role, permissions)| (Some(role), permissions))
                    .unwrap_or_default(),
                None => (None, Vec::new()),
            };

            debug!(profile_id, "Grant loaded from store");
            Ok(UserGrant {
                profile_id,
                username: profile.username,
                status: profile.status,
                role,
                permissions,
            })
        })
        .await?;
    Ok(grant)
}

/// Drops the cached grant of one profile.
pub(crate) async fn evict_grant(profile_id: i32) -> WebResult<()> {
    grant_cache().await?.delete(profile_id.to_string()).await?;
    Ok(())
}

/// Drops every cached grant, after a change to a role or its permissions.
pub(crate) async fn evict_all_grants() -> WebResult<()> {
    let removed = grant_cache().await?.delete_all().await?;
    debug!(removed, "Grant cache cleared");
    Ok(())
}
