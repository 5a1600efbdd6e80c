//! Router module for every API route.

pub mod public;
pub mod v1;

use actix_web::web;
use std::sync::Arc;
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_error::{rbac::RBACError, UMResult};
use usedmart_models::PermChecker;

/// Routes mounted under the router prefix.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(v1::configure_v1_routes);
}

/// Routes mounted at the root, outside the router prefix.
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(public::configure_public_routes);
}

/// Registers the permission rule of every protected route. Runs once at
/// startup, before the server accepts requests.
#[inline]
#[instrument(name = "init-rbac-rules", skip(router_prefix, perm_checker))]
pub async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: Arc<dyn PermChecker>,
) -> UMResult<(), RBACError> {
    info!("Initializing all RBAC rules for protected routes...");
    let checker = perm_checker
        .downcast_ref::<UMPermChecker>()
        .ok_or(RBACError::Primitive)?;

    v1::init_rbac_rules(router_prefix, checker).await?;

    info!("All RBAC rules initialized successfully");
    Ok(())
}
