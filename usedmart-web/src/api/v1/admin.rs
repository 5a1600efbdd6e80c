//! Moderation console: marketplace statistics, listing review and oversight
//! of messages and orders.

use super::product_filter;
use crate::{
    middleware::RequestContext,
    rbac::{has_any_permission, has_any_role, has_permission},
};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_core::listing::{check_approve, check_reject};
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    constants::MODERATOR_ROLE_CODE,
    domain::prelude::{
        AdminOrderPageParams, IdPayload, MarketStats, MessageInfo, MessagePageParams, OrderFilter,
        OrderInfo, PageResult, PathId, ProductInfo, ProductSearchParams, RejectProduct,
    },
    enums::{
        common::{EntityType, Operation},
        product::ProductStatus,
    },
    rbac::PermRule,
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{MessageRepository, OrderRepository, ProductRepository, StatsRepository};

pub(super) const ROUTER_PREFIX: &str = "/admin";

/// Configure moderation routes
///
/// # Routes
/// - GET `/stats`: Marketplace counters
/// - GET `/product/page`: Listings in any status
/// - PUT `/product/approve`: Publish a pending or rejected listing
/// - PUT `/product/reject`: Reject a pending or active listing with a reason
/// - GET `/message/page`: Every message
/// - DELETE `/message/{id}`: Remove a message
/// - GET `/order/page`: Every order
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(stats))
        .route("/product/page", web::get().to(product_page))
        .route("/product/approve", web::put().to(approve_product))
        .route("/product/reject", web::put().to(reject_product))
        .route("/message/page", web::get().to(message_page))
        .route("/message/{id}", web::delete().to(delete_message))
        .route("/order/page", web::get().to(order_page));
}

/// Initialize RBAC rules for the moderation console
///
/// # Description
/// Moderators and anyone who can review listings see the statistics.
/// Everything else is granted per permission
/// so custom roles can take over parts of the console.
#[inline]
#[instrument(name = "init-admin-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing admin module RBAC rules...");

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/stats"),
            has_any_role(&[MODERATOR_ROLE_CODE])?.or(has_any_permission(
                EntityType::Product,
                &[Operation::Read, Operation::Approve],
            )?),
        )
        .await?;

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/product/page"),
            has_permission(EntityType::Product, Operation::Read)?,
        )
        .await?;

    for path in ["/product/approve", "/product/reject"] {
        perm_checker
            .register(
                Method::PUT,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                has_permission(EntityType::Product, Operation::Approve)?,
            )
            .await?;
    }

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/message/page"),
            has_permission(EntityType::Message, Operation::Read)?,
        )
        .await?;

    perm_checker
        .register(
            Method::DELETE,
            format!("{router_prefix}{ROUTER_PREFIX}/message/{{id}}"),
            has_permission(EntityType::Message, Operation::Delete)?,
        )
        .await?;

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/order/page"),
            has_permission(EntityType::Order, Operation::Read)?,
        )
        .await?;

    info!("Admin module RBAC rules initialized successfully");
    Ok(())
}

/// `GET /api/admin/stats`
async fn stats() -> WebResult<WebResponse<MarketStats>> {
    Ok(WebResponse::ok(
        StatsRepository::collect::<DatabaseConnection>(None).await?,
    ))
}

/// Listings in any status
///
/// # Endpoint
/// `GET /api/admin/product/page`
///
/// # Parameters
/// Same as the public catalog, plus `status`.
async fn product_page(
    params: Query<ProductSearchParams>,
) -> WebResult<WebResponse<PageResult<ProductInfo>>> {
    let filter = product_filter(params.into_inner(), None).await?;
    Ok(WebResponse::ok(
        ProductRepository::page::<DatabaseConnection>(filter, None).await?,
    ))
}

/// Approve a listing
///
/// # Endpoint
/// `PUT /api/admin/product/approve`
///
/// # Description
/// Pending and rejected listings become active. A previous rejection reason
/// is cleared.
#[instrument(name = "approve-product", skip_all, fields(product_id = req.id))]
async fn approve_product(
    ctx: RequestContext,
    req: Json<IdPayload>,
) -> WebResult<WebResponse<ProductInfo>> {
    let product = ProductRepository::find_by_id::<DatabaseConnection>(req.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Product.to_string()))?;
    check_approve(product.status)?;

    let updated = ProductRepository::update_status::<DatabaseConnection>(
        product.id,
        ProductStatus::Active,
        Some(None),
        None,
    )
    .await?;
    info!(moderator_id = ctx.profile_id()?, "Listing approved");
    Ok(WebResponse::ok(updated.into()))
}

/// Reject a listing
///
/// # Endpoint
/// `PUT /api/admin/product/reject`
///
/// # Description
/// Pending and active listings become rejected with `reason`, which the
/// seller sees. Editing the listing sends it back for review.
#[instrument(name = "reject-product", skip_all, fields(product_id = req.id))]
async fn reject_product(
    ctx: RequestContext,
    req: Json<RejectProduct>,
) -> WebResult<WebResponse<ProductInfo>> {
    let req = req.into_inner();
    let product = ProductRepository::find_by_id::<DatabaseConnection>(req.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Product.to_string()))?;
    check_reject(product.status)?;

    let updated = ProductRepository::update_status::<DatabaseConnection>(
        product.id,
        ProductStatus::Rejected,
        Some(Some(req.reason)),
        None,
    )
    .await?;
    info!(moderator_id = ctx.profile_id()?, "Listing rejected");
    Ok(WebResponse::ok(updated.into()))
}

async fn message_page(
    params: Query<MessagePageParams>,
) -> WebResult<WebResponse<PageResult<MessageInfo>>> {
    Ok(WebResponse::ok(
        MessageRepository::page::<DatabaseConnection>(params.into_inner(), None).await?,
    ))
}

async fn delete_message(
    ctx: RequestContext,
    params: Path<PathId>,
) -> WebResult<WebResponse<bool>> {
    let removed = MessageRepository::delete::<DatabaseConnection>(params.id, None).await?;
    if removed == 0 {
        return Err(WebError::NotFound(EntityType::Message.to_string()));
    }
    info!(message_id = params.id, moderator_id = ctx.profile_id()?, "Message removed");
    Ok(WebResponse::ok(true))
}

async fn order_page(
    params: Query<AdminOrderPageParams>,
) -> WebResult<WebResponse<PageResult<OrderInfo>>> {
    let params = params.into_inner();
    let filter = OrderFilter {
        buyer_id: params.buyer_id,
        seller_id: params.seller_id,
        product_id: params.product_id,
        status: params.status,
        time_range: params.time_range,
        page: params.page,
    };
    Ok(WebResponse::ok(
        OrderRepository::page::<DatabaseConnection>(filter, None).await?,
    ))
}
