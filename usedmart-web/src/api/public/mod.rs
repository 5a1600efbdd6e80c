//! Routes mounted at the root, independent of the router prefix and the API
//! version header.

mod health;

use actix_web::web;

#[inline]
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_health_routes);
}
