//! HTTP API of the marketplace.
mod api;
mod grant;
mod middleware;
mod rbac;
mod state;
mod validation;
mod visitor;

use actix_web::{
    dev::{Server, ServerHandle},
    middleware::{Compress, Logger, NormalizePath},
    web::{self, Data},
    App, HttpServer,
};
use async_trait::async_trait;
use middleware::cors::middleware;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use usedmart_common::shutdown_on_error;
use usedmart_error::{init::InitContextError, UMError, UMResult};
use usedmart_models::{settings::Settings, PermChecker, WebServer};
use validation::prelude::create_default_manager;

pub use state::AppState;

#[derive(Clone)]
pub struct UMWebServer {
    server: Arc<Mutex<Option<ServerHandle>>>,
}

impl UMWebServer {
    async fn create_server(
        settings: &Settings,
        perm_checker: Arc<dyn PermChecker>,
    ) -> UMResult<Server> {
        api::init_rbac_rules(&settings.web.router_prefix, perm_checker)
            .await
            .map_err(|e| UMError::from(format!("Failed to initialize RBAC rules: {e}")))?;

        let state = AppState::new(
            Arc::new(create_default_manager()),
            state::view_gate().await?,
        );

        let addr = format!("{}:{}", settings.web.host, settings.web.port);
        let router_prefix = settings.web.router_prefix.clone();
        let worker_count = settings.web.get_worker_count();
        let cors_config = settings.web.cors.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(Arc::new(state.clone())))
                .wrap(middleware(&cors_config))
                .wrap(Logger::default())
                .wrap(Compress::default())
                .wrap(NormalizePath::trim())
                .configure(api::configure_public_routes)
                .service(web::scope(&router_prefix).configure(api::configure_routes))
        })
        .workers(worker_count)
        .bind(&addr)
        .map_err(|e| UMError::from(format!("Failed to bind HTTP server to {addr}: {e}")))?;

        info!(%addr, workers = worker_count, "HTTP server bound");
        Ok(server.run())
    }
}

#[async_trait]
impl WebServer for UMWebServer {
    #[inline]
    #[instrument(name = "init-web-server", skip_all)]
    async fn init(
        settings: &Settings,
        perm_checker: Arc<dyn PermChecker>,
    ) -> UMResult<Arc<Self>, InitContextError> {
        let server = Self::create_server(settings, perm_checker)
            .await
            .map_err(|e| {
                InitContextError::Primitive(format!("Failed to create web server: {e}"))
            })?;
        let server_handle = server.handle();

        tokio::spawn(shutdown_on_error(async move {
            server.await.map_err(UMError::from)
        }));

        Ok(Arc::new(UMWebServer {
            server: Arc::new(Mutex::new(Some(server_handle))),
        }))
    }

    #[inline]
    #[instrument(name = "web-server-stop", skip_all)]
    async fn stop(&self) -> UMResult<()> {
        info!("Stopping web server...");
        if let Some(handle) = self.server.lock().await.take() {
            handle.stop(true).await;
        }
        info!("Web server stopped");
        Ok(())
    }
}
