pub mod cache;
pub mod constants;
pub mod domain;
pub mod entities;
pub mod enums;
mod idens;
pub mod initializer;
pub mod rbac;
pub mod settings;
pub mod web;

use crate::{cache::UMBaseCache, rbac::PermRule};
use actix_web::http::Method;
use async_trait::async_trait;
use cache::UserGrant;
use downcast_rs::{impl_downcast, DowncastSync};
use sea_orm::DatabaseConnection;
use settings::Settings;
use std::{sync::Arc, time::Duration};
use usedmart_error::{
    init::InitContextError,
    rbac::RBACError,
    storage::{CacheError, StorageError},
    UMResult,
};

impl_downcast!(sync WebServer);
impl_downcast!(sync DbManager);
impl_downcast!(sync CacheProvider);
impl_downcast!(sync PermChecker);

/// Owns the relational store connection pool.
#[async_trait]
pub trait DbManager: DowncastSync + Send + Sync + 'static {
    /// Connects to the configured database and brings the schema up to date.
    async fn init(settings: &Settings) -> UMResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    fn get_connection(&self) -> UMResult<DatabaseConnection, StorageError>;

    async fn close(&self) -> UMResult<()>;
}

/// Registry of named, typed caches.
#[async_trait]
pub trait CacheProvider: DowncastSync + Send + Sync + 'static {
    async fn init(settings: &Settings) -> UMResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Registers a cache for values of type `V`. Names are unique per provider.
    fn create_cache<V>(
        &mut self,
        cache_name: &str,
        max_capacity: Option<u64>,
        ttl: Option<Duration>,
    ) -> UMResult<(), CacheError>
    where
        Self: Sized,
        V: Clone + Send + Sync + 'static;

    fn get_cache<V>(
        &self,
        cache_name: &str,
    ) -> UMResult<Arc<dyn UMBaseCache<Value = V> + Send + Sync>, CacheError>
    where
        Self: Sized,
        V: Clone + Send + Sync + 'static;
}

/// HTTP API server.
#[async_trait]
pub trait WebServer: DowncastSync + Send + Sync + 'static {
    async fn init(
        settings: &Settings,
        perm_checker: Arc<dyn PermChecker>,
    ) -> UMResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Stops accepting connections and waits for in-flight requests.
    async fn stop(&self) -> UMResult<()>;
}

/// Route-level authorization.
///
/// Rules are registered per `(method, route pattern)` at startup and
/// evaluated against the caller's [`UserGrant`] for every protected request.
#[async_trait]
pub trait PermChecker: DowncastSync + Send + Sync + 'static {
    fn init() -> Arc<Self>
    where
        Self: Sized;

    /// Fails with [`RBACError::RuleExists`] when the route already has a rule.
    async fn register<R: PermRule + 'static>(
        &self,
        method: Method,
        path: String,
        rule: R,
    ) -> UMResult<(), RBACError>
    where
        Self: Sized;

    /// Routes without a registered rule only require authentication.
    async fn check(
        &self,
        method: &str,
        path: &str,
        grant: Arc<UserGrant>,
    ) -> UMResult<bool, RBACError>;
}
