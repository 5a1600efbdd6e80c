//! Process-wide application context.
//!
//! [`UMAppContext`] owns the settings, the logger and every long-lived
//! subsystem (database, caches, permission checker, web server). It is built
//! once at startup and read from anywhere through [`UMAppContext::instance`].
mod logger;
mod perm;

pub use logger::Logger;
pub use perm::UMPermChecker;
pub use usedmart_error::{UMError, UMResult};

use once_cell::sync::OnceCell;
use std::{
    future::Future,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
#[cfg(not(unix))]
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, instrument, span, warn, Level};
use usedmart_models::{
    constants::{DATA_DIR, LOG_DIR},
    settings::Settings,
    CacheProvider, DbManager, PermChecker, WebServer,
};

static APP_CONTEXT: OnceCell<RwLock<UMAppContext>> = OnceCell::new();

pub struct UMAppContext {
    settings: Option<Settings>,
    logger: Logger,
    db_manager: Option<Arc<dyn DbManager>>,
    cache_provider: Option<Arc<dyn CacheProvider>>,
    web_server: Option<Arc<dyn WebServer>>,
    perm_checker: Option<Arc<dyn PermChecker>>,
    shutting_down: AtomicBool,
    shutdown_token: CancellationToken,
}

impl UMAppContext {
    #[inline]
    pub async fn instance() -> UMResult<RwLockReadGuard<'static, UMAppContext>> {
        match APP_CONTEXT.get() {
            Some(ctx) => Ok(ctx.read().await),
            None => Err(UMError::from("UMAppContext is not initialized")),
        }
    }

    #[inline]
    pub async fn instance_mut() -> UMResult<RwLockWriteGuard<'static, UMAppContext>> {
        match APP_CONTEXT.get() {
            Some(ctx) => Ok(ctx.write().await),
            None => Err(UMError::from("UMAppContext is not initialized")),
        }
    }

    /// Builds the global context.
    ///
    /// Order: settings, runtime directories, logger, database, caches,
    /// permission checker, web server. The web server comes last because
    /// route registration needs the checker.
    pub async fn init<D, P, C, W>(config: String) -> UMResult<()>
    where
        D: DbManager + 'static,
        P: CacheProvider + 'static,
        C: PermChecker + 'static,
        W: WebServer + 'static,
    {
        let settings = Settings::new(config)?;
        apply_runtime_dir(&settings.general.runtime_dir)?;

        ensure_runtime_directories()?;

        let mut logger = Logger::new(Some(Logger::parse_level(&settings.general.log_level)));
        logger.initialize()?;

        let span = span!(Level::INFO, "init-app");
        let _guard = span.enter();

        let ctx = UMAppContext {
            settings: Some(settings),
            logger,
            db_manager: None,
            cache_provider: None,
            web_server: None,
            perm_checker: None,
            shutting_down: AtomicBool::new(false),
            shutdown_token: CancellationToken::new(),
        };

        APP_CONTEXT
            .set(RwLock::new(ctx))
            .map_err(|_| UMError::from("UMAppContext is already initialized"))?;

        // Handlers resolve the database through the global context, so the
        // context is published before the subsystems and filled in place.
        let mut ctx = Self::instance_mut().await?;
        ctx.init_db_manager::<D>().await?;
        ctx.init_cache_provider::<P>().await?;
        ctx.init_perm_checker::<C>();
        drop(ctx);

        let (settings, perm_checker) = {
            let ctx = Self::instance().await?;
            (ctx.settings()?.clone(), ctx.perm_checker()?)
        };
        let web_server = W::init(&settings, perm_checker).await?;
        Self::instance_mut().await?.web_server = Some(web_server);
        info!("Web server initialized successfully.");
        Ok(())
    }

    async fn init_db_manager<D: DbManager + 'static>(&mut self) -> UMResult<()> {
        self.db_manager = Some(D::init(self.settings()?).await?);
        info!("Database initialized successfully.");
        Ok(())
    }

    async fn init_cache_provider<P: CacheProvider + 'static>(&mut self) -> UMResult<()> {
        self.cache_provider = Some(P::init(self.settings()?).await?);
        info!("Cache provider initialized successfully.");
        Ok(())
    }

    fn init_perm_checker<C: PermChecker + 'static>(&mut self) {
        self.perm_checker = Some(C::init());
        info!("Perm checker initialized successfully.");
    }

    #[inline]
    pub fn settings(&self) -> UMResult<&Settings> {
        self.settings
            .as_ref()
            .ok_or(UMError::from("Settings not initialized"))
    }

    #[inline]
    pub fn db_manager(&self) -> UMResult<Arc<dyn DbManager>> {
        self.db_manager
            .as_ref()
            .ok_or(UMError::from("Database manager not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn cache_provider(&self) -> UMResult<Arc<dyn CacheProvider>> {
        self.cache_provider
            .as_ref()
            .ok_or(UMError::from("Cache provider not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn web_server(&self) -> UMResult<Arc<dyn WebServer>> {
        self.web_server
            .as_ref()
            .ok_or(UMError::from("Web server not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn perm_checker(&self) -> UMResult<Arc<dyn PermChecker>> {
        self.perm_checker
            .as_ref()
            .ok_or(UMError::from("Perm checker not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn change_log_level(&self, level: Level) {
        self.logger.set_level(level);
    }

    /// Cancels [`UMAppContext::run`] from inside the process.
    #[inline]
    pub fn request_shutdown(&self) {
        self.shutdown_token.cancel();
    }

    /// Waits for a termination signal, then shuts every subsystem down.
    pub async fn run() -> UMResult<()> {
        let token = Self::instance().await?.shutdown_token.clone();
        wait_for_signal(token).await?;
        Self::instance().await?.graceful_shutdown().await
    }

    /// Stops the web server first so no request sees a closed database.
    #[instrument(name = "graceful-shutdown", skip_all)]
    pub async fn graceful_shutdown(&self) -> UMResult<()> {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Starting graceful shutdown...");

        if let Some(web_server) = &self.web_server {
            if let Err(e) = web_server.stop().await {
                warn!("Web server did not stop cleanly: {e}");
            }
        }

        let tracker = TaskTracker::new();
        if let Some(db_manager) = &self.db_manager {
            let db_manager = Arc::clone(db_manager);
            tracker.spawn(async move {
                if let Err(e) = db_manager.close().await {
                    warn!("Database did not close cleanly: {e}");
                }
            });
        }
        tracker.close();
        tracker.wait().await;

        info!("Graceful shutdown completed");
        Ok(())
    }
}

async fn wait_for_signal(shutdown_token: CancellationToken) -> UMResult<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM signal"),
            _ = sigint.recv() => info!("Received SIGINT signal"),
            _ = shutdown_token.cancelled() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = ctrl_c() => info!("Received ctrl-c signal"),
            _ = shutdown_token.cancelled() => {}
        }
    }

    Ok(())
}

/// Switches the working directory so `./data` and `./logs` land under `runtime_dir`.
fn apply_runtime_dir(runtime_dir: &str) -> UMResult<()> {
    let dir = runtime_dir.trim();
    if dir.is_empty() || dir == "." {
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| UMError::from(format!("Failed to create runtime_dir {dir}: {e}")))?;
    std::env::set_current_dir(dir)
        .map_err(|e| UMError::from(format!("Failed to enter runtime_dir {dir}: {e}")))?;
    Ok(())
}

fn ensure_runtime_directories() -> UMResult<()> {
    for dir in [Path::new(DATA_DIR), Path::new(LOG_DIR)] {
        std::fs::create_dir_all(dir).map_err(|e| {
            UMError::from(format!("Failed to create directory {}: {e}", dir.display()))
        })?;
    }
    Ok(())
}

/// Runs `fut` and requests shutdown when it fails, so a crashed server
/// does not leave the process waiting for a signal.
pub async fn shutdown_on_error<F>(fut: F)
where
    F: Future<Output = UMResult<()>>,
{
    if let Err(e) = fut.await {
        warn!("Background task failed: {e}");
        if let Ok(ctx) = UMAppContext::instance().await {
            ctx.request_shutdown();
        }
    }
}
