mod cache;
mod migration;
mod sql;

pub use crate::cache::moka::MokaCache;
pub use migration::Migrator;

use async_trait::async_trait;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use sql::sqlite;
use std::{any::Any, collections::HashMap, sync::Arc, time::Duration};
use tracing::{info, instrument};
use usedmart_error::{
    init::InitContextError,
    storage::{CacheError, StorageError},
    UMResult,
};
use usedmart_models::{
    cache::{
        UMBaseCache, UserGrant, PRODUCT_VIEW_CACHE_NAME, USER_GRANT_CACHE_NAME,
        VIEW_MARKER_CACHE_NAME,
    },
    settings::{CacheType, Settings},
    CacheProvider, DbManager,
};

const USER_GRANT_CAPACITY: u64 = 10_000;
const PRODUCT_VIEW_CAPACITY: u64 = 100_000;

pub struct UMDbManager {
    db_conn: Option<DatabaseConnection>,
}

impl UMDbManager {
    /// Connect and migrate without going through [`DbManager::init`].
    pub async fn connect(settings: &Settings) -> UMResult<DatabaseConnection, InitContextError> {
        let db = sqlite::init_db(&settings.db.sqlite).await.map_err(|e| {
            InitContextError::Primitive(format!("Failed to init SQLite database: {e}"))
        })?;

        Migrator::up(&db, None).await.map_err(|e| {
            InitContextError::Primitive(format!("Failed to migrate SQLite database: {e}"))
        })?;

        Ok(db)
    }
}

#[async_trait]
impl DbManager for UMDbManager {
    #[inline]
    #[instrument(name = "init-db-manager", skip_all)]
    async fn init(settings: &Settings) -> UMResult<Arc<Self>, InitContextError> {
        let db_conn = Self::connect(settings).await?;
        info!("Database manager initialized successfully");
        Ok(Arc::new(UMDbManager {
            db_conn: Some(db_conn),
        }))
    }

    #[inline]
    fn get_connection(&self) -> UMResult<DatabaseConnection, StorageError> {
        self.db_conn
            .as_ref()
            .ok_or(StorageError::StorageUnavailable)
            .cloned()
    }

    #[inline]
    #[instrument(name = "db-close", skip_all)]
    async fn close(&self) -> UMResult<()> {
        info!("Closing database connections...");
        if let Some(db) = &self.db_conn {
            db.clone().close().await?;
        }
        info!("Database connections closed");
        Ok(())
    }
}

#[derive(Debug)]
pub struct UMCacheProvider {
    prefix: String,
    delimiter: String,
    cache_type: CacheType,
    caches: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl UMCacheProvider {
    pub fn new(prefix: &str, delimiter: &str, cache_type: CacheType) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: delimiter.into(),
            cache_type,
            caches: HashMap::new(),
        }
    }

    #[instrument(name = "init-caches", skip_all)]
    fn init_caches(&mut self, settings: &Settings) -> UMResult<(), CacheError> {
        self.create_cache::<UserGrant>(
            USER_GRANT_CACHE_NAME,
            Some(USER_GRANT_CAPACITY),
            Some(settings.cache.grant_ttl()),
        )?;
        self.create_cache::<i64>(
            VIEW_MARKER_CACHE_NAME,
            Some(settings.cache.view_marker_capacity),
            Some(settings.cache.view_marker_ttl()),
        )?;
        self.create_cache::<i64>(PRODUCT_VIEW_CACHE_NAME, Some(PRODUCT_VIEW_CAPACITY), None)?;
        Ok(())
    }
}

#[async_trait]
impl CacheProvider for UMCacheProvider {
    #[inline]
    #[instrument(name = "init-cache-provider", skip(settings))]
    async fn init(settings: &Settings) -> UMResult<Arc<Self>, InitContextError> {
        let mut provider = Self::new(
            &settings.cache.prefix,
            &settings.cache.delimiter,
            settings.cache.r#type,
        );
        provider
            .init_caches(settings)
            .map_err(|e| InitContextError::Primitive(format!("Failed to create caches: {e}")))?;
        Ok(Arc::new(provider))
    }

    #[instrument(name = "create-cache", skip(self))]
    fn create_cache<V: Clone + Send + Sync + 'static>(
        &mut self,
        cache_name: &str,
        max_capacity: Option<u64>,
        ttl: Option<Duration>,
    ) -> UMResult<(), CacheError> {
        if self.caches.contains_key(cache_name) {
            return Err(CacheError::AlreadyExists(cache_name.to_string()));
        }

        let full_prefix = format!("{}{}{}", self.prefix, self.delimiter, cache_name);
        let cache = match self.cache_type {
            CacheType::Moka => {
                MokaCache::<V>::new(cache_name.to_string(), full_prefix, max_capacity, ttl)
            }
        };
        let cache: Arc<dyn UMBaseCache<Value = V> + Send + Sync> = Arc::new(cache);
        self.caches.insert(cache_name.to_string(), Arc::new(cache));
        info!("Cache created: {}", cache_name);
        Ok(())
    }

    #[inline]
    fn get_cache<V>(
        &self,
        cache_name: &str,
    ) -> UMResult<Arc<dyn UMBaseCache<Value = V> + Send + Sync>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.caches
            .get(cache_name)
            .and_then(|cache| {
                cache
                    .downcast_ref::<Arc<dyn UMBaseCache<Value = V> + Send + Sync>>()
                    .map(Arc::clone)
            })
            .ok_or_else(|| CacheError::NotFound(cache_name.to_string()))
    }
}
