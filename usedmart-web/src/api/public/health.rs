use actix_web::{web, HttpResponse};
use sea_orm::ConnectionTrait;
use tracing::warn;
use usedmart_repository::get_db_connection;

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

/// `OK` while the database answers, 503 otherwise.
async fn health() -> HttpResponse {
    let reachable = match get_db_connection().await {
        Ok(db) => db.execute_unprepared("SELECT 1").await.is_ok(),
        Err(_) => false,
    };
    if reachable {
        HttpResponse::Ok().body("OK")
    } else {
        warn!("Health check failed: database unreachable");
        HttpResponse::ServiceUnavailable().body("UNAVAILABLE")
    }
}
