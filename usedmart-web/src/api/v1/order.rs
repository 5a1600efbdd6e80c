//! Order placement and fulfilment between a buyer and a seller.

use crate::{middleware::RequestContext, rbac::is_authenticated};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};
use usedmart_common::UMPermChecker;
use usedmart_core::ordering::{
    check_order_transition, check_purchase, party_of, product_status_on,
};
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        ChangeOrderStatus, CreateOrder, CreateOrderResult, NewMessage, NewOrder, OrderDetail,
        OrderFilter, OrderInfo, OrderPageParams, PageResult, PathId,
    },
    enums::{
        common::{permission_code, EntityType, Operation},
        order::{OrderParty, OrderStatus},
    },
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{
    MessageRepository, OrderRepository, ProductRepository, ProfileRepository,
};

pub(super) const ROUTER_PREFIX: &str = "/order";

/// Configure order routes
///
/// # Routes
/// - POST ``: Place an order for an active listing
/// - GET `/page`: The caller's orders as buyer or seller
/// - GET `/detail/{id}`: One order with its listing and both parties
/// - PUT `/change-status`: Move an order along its lifecycle
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/change-status", web::put().to(change_status));
}

/// Participation is checked inside the handlers.
#[inline]
#[instrument(name = "init-order-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing order module RBAC rules...");

    for (method, path) in [
        (Method::POST, ""),
        (Method::GET, "/page"),
        (Method::GET, "/detail/{id}"),
        (Method::PUT, "/change-status"),
    ] {
        perm_checker
            .register(
                method,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                is_authenticated()?,
            )
            .await?;
    }

    info!("Order module RBAC rules initialized successfully");
    Ok(())
}

/// Place an order
///
/// # Endpoint
/// `POST /api/order`
///
/// # Description
/// The amount is the listing's current price. When `message` is present it
/// is sent to the seller after the order is stored. A failed message does not
/// undo the order, `messageSent` reports it.
///
/// # Errors
/// - Bad Request (400): buying an own listing, or a listing that is not active
/// - Not Found (404): unknown listing
#[instrument(name = "create-order", skip_all)]
async fn create(
    ctx: RequestContext,
    req: Json<CreateOrder>,
) -> WebResult<WebResponse<CreateOrderResult>> {
    let buyer_id = ctx.profile_id()?;
    let req = req.into_inner();

    let product = ProductRepository::find_by_id::<DatabaseConnection>(req.product_id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Product.to_string()))?;
    check_purchase(buyer_id, product.seller_id, product.status)?;

    let order = OrderRepository::create::<DatabaseConnection>(
        NewOrder {
            product_id: product.id,
            buyer_id,
            seller_id: product.seller_id,
            amount: product.price,
            status: OrderStatus::Pending,
            shipping_address: req.shipping_address,
            note: req.note,
        },
        None,
    )
    .await?;
    info!(order_id = order.id, buyer_id, product_id = product.id, "Order placed");

    let mut message_sent = false;
    if let Some(content) = req.message {
        match MessageRepository::create::<DatabaseConnection>(
            NewMessage::unread(buyer_id, product.seller_id, product.id, content),
            None,
        )
        .await
        {
            Ok(_) => message_sent = true,
            Err(e) => {
                warn!(order_id = order.id, error = %e, "Order placed but the message to the seller failed")
            }
        }
    }

    Ok(WebResponse::ok(CreateOrderResult {
        order: order.into(),
        message_sent,
    }))
}

/// `GET /api/order/page?as=buyer|seller&status=`
async fn page(
    ctx: RequestContext,
    params: Query<OrderPageParams>,
) -> WebResult<WebResponse<PageResult<OrderInfo>>> {
    let me = ctx.profile_id()?;
    let params = params.into_inner();
    let (buyer_id, seller_id) = match params.party {
        OrderParty::Buyer => (Some(me), None),
        OrderParty::Seller => (None, Some(me)),
    };
    let filter = OrderFilter {
        buyer_id,
        seller_id,
        status: params.status,
        page: params.page,
        ..Default::default()
    };
    Ok(WebResponse::ok(
        OrderRepository::page::<DatabaseConnection>(filter, None).await?,
    ))
}

/// Retrieve one order
///
/// # Endpoint
/// `GET /api/order/detail/{id}`
///
/// # Authorization
/// The buyer, the seller, or a holder of `order:read`
async fn get_by_id(
    ctx: RequestContext,
    params: Path<PathId>,
) -> WebResult<WebResponse<OrderDetail>> {
    let grant = ctx.grant()?;
    let order = OrderRepository::find_by_id::<DatabaseConnection>(params.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Order.to_string()))?;

    if party_of(grant.profile_id, order.buyer_id, order.seller_id).is_none()
        && !grant.has_permission(&permission_code(EntityType::Order, Operation::Read))
    {
        // Strangers learn nothing about the order's existence.
        return Err(WebError::NotFound(EntityType::Order.to_string()));
    }

    Ok(WebResponse::ok(order_detail(order.into()).await?))
}

/// Move an order along its lifecycle
///
/// # Endpoint
/// `PUT /api/order/change-status`
///
/// # Description
/// | From      | To        | Actor           |
/// |-----------|-----------|-----------------|
/// | pending   | confirmed | seller          |
/// | pending   | cancelled | buyer or seller |
/// | confirmed | shipped   | seller          |
/// | confirmed | cancelled | seller          |
/// | shipped   | completed | buyer           |
///
/// Confirming marks the listing sold in the same transaction.
///
/// # Errors
/// - Bad Request (400): the transition is not allowed for the caller, or
///   the listing is no longer active when confirming
/// - Not Found (404): the caller is not a party to the order
#[instrument(name = "change-order-status", skip_all, fields(order_id = req.id))]
async fn change_status(
    ctx: RequestContext,
    req: Json<ChangeOrderStatus>,
) -> WebResult<WebResponse<OrderInfo>> {
    let me = ctx.profile_id()?;
    let req = req.into_inner();
    let order = OrderRepository::find_by_id::<DatabaseConnection>(req.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Order.to_string()))?;

    let actor = party_of(me, order.buyer_id, order.seller_id)
        .ok_or(WebError::NotFound(EntityType::Order.to_string()))?;
    check_order_transition(order.status, req.status, actor)?;

    let updated = OrderRepository::update_status::<DatabaseConnection>(
        order,
        req.status,
        product_status_on(req.status),
        None,
    )
    .await?;
    Ok(WebResponse::ok(updated.into()))
}

async fn order_detail(order: OrderInfo) -> WebResult<OrderDetail> {
    let product = ProductRepository::find_briefs::<DatabaseConnection>(vec![order.product_id], None)
        .await?
        .pop();
    let buyer = ProfileRepository::find_brief::<DatabaseConnection>(order.buyer_id, None).await?;
    let seller = ProfileRepository::find_brief::<DatabaseConnection>(order.seller_id, None).await?;
    Ok(OrderDetail {
        order,
        product,
        buyer,
        seller,
    })
}
