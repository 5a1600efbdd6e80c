//! V1 version API routes
mod admin;
mod auth;
mod catalog;
mod category;
mod favorite;
mod message;
mod order;
mod permission;
mod product;
mod profile;
mod role;
mod settings;

use crate::middleware::{auth::Authentication, perm::PermService};
use actix_web::{
    guard::{Guard, GuardContext},
    web,
};
use sea_orm::DatabaseConnection;
use usedmart_common::UMPermChecker;
use usedmart_core::MarketSettings;
use usedmart_error::{rbac::RBACError, UMResult, WebResult};
use usedmart_models::{
    constants::{API_VERSION_HEADER, API_VERSION_V1},
    domain::prelude::{ProductFilter, ProductSearchParams},
    enums::product::ProductStatus,
};
use usedmart_repository::{CategoryRepository, SettingsRepository};

/// API version guard for v1
pub struct ApiV1Guard;

impl Guard for ApiV1Guard {
    fn check(&self, ctx: &GuardContext<'_>) -> bool {
        // Accept-Api-Version wins over X-API-Version when both are sent
        ctx.head().headers().get("Accept-Api-Version").map_or_else(
            || {
                ctx.head()
                    .headers()
                    .get(API_VERSION_HEADER)
                    .is_some_and(|v| v.as_bytes() == API_VERSION_V1.as_bytes())
            },
            |v| v.as_bytes() == API_VERSION_V1.as_bytes(),
        )
    }
}

/// Configure all v1 routes
pub fn configure_v1_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_public_routes)
        .configure(configure_protected_routes);
}

/// Routes reachable without a bearer token.
fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        format!("{}/login", auth::ROUTER_PREFIX).as_str(),
        web::post().to(auth::login),
    )
    .service(web::scope(catalog::ROUTER_PREFIX).configure(catalog::configure_routes));
}

fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .guard(ApiV1Guard)
            .wrap(PermService)
            .wrap(Authentication)
            .service(web::scope(profile::ROUTER_PREFIX).configure(profile::configure_routes))
            .service(web::scope(category::ROUTER_PREFIX).configure(category::configure_routes))
            .service(web::scope(product::ROUTER_PREFIX).configure(product::configure_routes))
            .service(web::scope(favorite::ROUTER_PREFIX).configure(favorite::configure_routes))
            .service(web::scope(message::ROUTER_PREFIX).configure(message::configure_routes))
            .service(web::scope(order::ROUTER_PREFIX).configure(order::configure_routes))
            .service(web::scope(role::ROUTER_PREFIX).configure(role::configure_routes))
            .service(
                web::scope(permission::ROUTER_PREFIX).configure(permission::configure_routes),
            )
            .service(web::scope(settings::ROUTER_PREFIX).configure(settings::configure_routes))
            .service(web::scope(admin::ROUTER_PREFIX).configure(admin::configure_routes)),
    );
}

/// Initialize RBAC rules for all v1 API modules
///
/// # Arguments
/// * `router_prefix` - Base URL prefix for all routes
/// * `perm_checker` - Permission checker instance for registering rules
pub async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> UMResult<(), RBACError> {
    profile::init_rbac_rules(router_prefix, perm_checker).await?;
    category::init_rbac_rules(router_prefix, perm_checker).await?;
    product::init_rbac_rules(router_prefix, perm_checker).await?;
    favorite::init_rbac_rules(router_prefix, perm_checker).await?;
    message::init_rbac_rules(router_prefix, perm_checker).await?;
    order::init_rbac_rules(router_prefix, perm_checker).await?;
    role::init_rbac_rules(router_prefix, perm_checker).await?;
    permission::init_rbac_rules(router_prefix, perm_checker).await?;
    settings::init_rbac_rules(router_prefix, perm_checker).await?;

    // Moderation console
    admin::init_rbac_rules(router_prefix, perm_checker).await?;

    Ok(())
}

/// Current marketplace switches, read fresh from `system_settings`.
async fn load_market_settings() -> WebResult<MarketSettings> {
    let pairs = SettingsRepository::find_pairs::<DatabaseConnection>(None).await?;
    Ok(MarketSettings::from_pairs(pairs))
}

/// Turns catalog query parameters into a repository filter. A category
/// selects its whole subtree. `statuses` overrides the `status` parameter.
async fn product_filter(
    params: ProductSearchParams,
    statuses: Option<Vec<ProductStatus>>,
) -> WebResult<ProductFilter> {
    let category_ids = match params.category {
        Some(root) => Some(
            CategoryRepository::find_descendant_ids::<DatabaseConnection>(root, None).await?,
        ),
        None => None,
    };
    Ok(ProductFilter {
        category_ids,
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        sort: params.sort.unwrap_or_default(),
        statuses: statuses.or(params.status.map(|status| vec![status])),
        condition: params.condition,
        min_price: params.min_price,
        max_price: params.max_price,
        seller_id: params.seller_id,
        time_range: params.time_range,
        page: params.page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::is_authenticated;
    use actix_web::{http::Method, test::TestRequest};
    use std::sync::Arc;
    use usedmart_models::{
        cache::UserGrant,
        constants::{MODERATOR_ROLE_CODE, USER_ROLE_CODE},
        domain::prelude::SimpleRole,
        enums::common::Status,
        PermChecker,
    };

    fn grant(role: &str, permissions: &[&str]) -> Arc<UserGrant> {
        Arc::new(UserGrant {
            profile_id: 5,
            username: "erin".into(),
            status: Status::Enabled,
            role: Some(SimpleRole {
                id: 3,
                code: role.into(),
            }),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        })
    }

    #[test]
    fn test_version_guard() {
        let req = TestRequest::default()
            .insert_header((API_VERSION_HEADER, API_VERSION_V1))
            .to_srv_request();
        assert!(ApiV1Guard.check(&req.guard_ctx()));

        let req = TestRequest::default()
            .insert_header(("Accept-Api-Version", "2"))
            .insert_header((API_VERSION_HEADER, API_VERSION_V1))
            .to_srv_request();
        assert!(!ApiV1Guard.check(&req.guard_ctx()));

        let req = TestRequest::default().to_srv_request();
        assert!(!ApiV1Guard.check(&req.guard_ctx()));
    }

    #[tokio::test]
    async fn test_every_module_registers_rules() {
        let checker = UMPermChecker::new();
        init_rbac_rules("/api", &checker).await.unwrap();

        for (method, path) in [
            (Method::POST, "/api/favorite"),
            (Method::DELETE, "/api/favorite/{productId}"),
            (Method::POST, "/api/message"),
            (Method::GET, "/api/message/unread-count"),
            (Method::PUT, "/api/order/change-status"),
        ] {
            let err = checker
                .register(method, path.into(), is_authenticated().unwrap())
                .await
                .unwrap_err();
            assert!(matches!(err, RBACError::RuleExists { .. }), "{path}");
        }
    }

    #[tokio::test]
    async fn test_stats_open_to_moderators_and_reviewers() {
        let checker = UMPermChecker::new();
        init_rbac_rules("/api", &checker).await.unwrap();
        let stats = |g| checker.check("GET", "/api/admin/stats", g);

        assert!(stats(grant(MODERATOR_ROLE_CODE, &[])).await.unwrap());
        assert!(stats(grant(USER_ROLE_CODE, &["product:approve"])).await.unwrap());
        assert!(!stats(grant(USER_ROLE_CODE, &["order:read"])).await.unwrap());
    }
}
