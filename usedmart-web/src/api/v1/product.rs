//! Seller-side listing management.

use super::{load_market_settings, product_filter};
use crate::{middleware::RequestContext, rbac::is_authenticated};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::{ActiveValue::Set, DatabaseConnection, IntoActiveModel};
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_core::listing::{
    check_image_count, check_new_listing, check_owner_transition, initial_status,
    status_after_edit,
};
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        ChangeProductStatus, CreateProduct, PageResult, PathId, ProductInfo, ProductSearchParams,
        UpdateProduct,
    },
    entities::prelude::ProductModel,
    enums::{
        common::{permission_code, EntityType, Operation},
        product::ProductStatus,
    },
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{CategoryRepository, ProductRepository};

pub(super) const ROUTER_PREFIX: &str = "/product";

/// Configure product routes
///
/// # Routes
/// - POST ``: Publish a listing
/// - PUT ``: Edit an own listing
/// - PUT `/change-status`: Deactivate, reactivate or mark an own listing sold
/// - GET `/mine`: The caller's listings in any status
/// - DELETE `/{id}`: Delete a listing
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/change-status", web::put().to(change_status))
        .route("/mine", web::get().to(mine))
        .route("/{id}", web::delete().to(delete));
}

/// Ownership is checked inside the handlers, the rules only demand a
/// signed-in caller.
#[inline]
#[instrument(name = "init-product-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing product module RBAC rules...");

    for (method, path) in [
        (Method::POST, ""),
        (Method::PUT, ""),
        (Method::PUT, "/change-status"),
        (Method::GET, "/mine"),
        (Method::DELETE, "/{id}"),
    ] {
        perm_checker
            .register(
                method,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                is_authenticated()?,
            )
            .await?;
    }

    info!("Product module RBAC rules initialized successfully");
    Ok(())
}

/// Publish a listing
///
/// # Endpoint
/// `POST /api/product`
///
/// # Description
/// The listing starts as `pending` when product approval is required, else
/// `active`.
///
/// # Errors
/// - Bad Request (400): listing limit or image limit reached, unknown category
/// - Service Unavailable (503): the marketplace is in maintenance mode
#[instrument(name = "create-product", skip_all)]
async fn create(
    ctx: RequestContext,
    req: Json<CreateProduct>,
) -> WebResult<WebResponse<ProductInfo>> {
    let seller_id = ctx.profile_id()?;
    let req = req.into_inner();

    let market = load_market_settings().await?;
    let existing = ProductRepository::count_open_by_seller::<DatabaseConnection>(seller_id, None)
        .await?;
    check_new_listing(&market, existing, req.images.len())?;
    ensure_category(req.category_id).await?;

    let product = ProductRepository::create::<DatabaseConnection>(
        req.into_new(seller_id, initial_status(&market)),
        None,
    )
    .await?;

    info!(product_id = product.id, seller_id, status = %product.status, "Listing published");
    Ok(WebResponse::ok(product.into()))
}

/// Edit an own listing
///
/// # Endpoint
/// `PUT /api/product`
///
/// # Description
/// A rejected listing goes back to `pending` and loses its rejection reason.
/// Sold listings cannot be edited.
async fn update(
    ctx: RequestContext,
    req: Json<UpdateProduct>,
) -> WebResult<WebResponse<ProductInfo>> {
    let req = req.into_inner();
    let existing = find_owned(req.id, ctx.profile_id()?).await?;
    let status = status_after_edit(existing.status)?;

    let market = load_market_settings().await?;
    check_image_count(&market, req.image_count())?;
    if let Some(category_id) = req.category_id {
        ensure_category(category_id).await?;
    }

    let mut model = req.into_active_model();
    model.status = Set(status);
    if existing.status == ProductStatus::Rejected {
        model.rejection_reason = Set(None);
    }

    let product = ProductRepository::update::<DatabaseConnection>(model, None).await?;
    Ok(WebResponse::ok(product.into()))
}

/// Move an own listing between `active`, `inactive` and `sold`
///
/// # Endpoint
/// `PUT /api/product/change-status`
async fn change_status(
    ctx: RequestContext,
    req: Json<ChangeProductStatus>,
) -> WebResult<WebResponse<ProductInfo>> {
    let req = req.into_inner();
    let existing = find_owned(req.id, ctx.profile_id()?).await?;
    check_owner_transition(existing.status, req.status)?;

    let product =
        ProductRepository::update_status::<DatabaseConnection>(req.id, req.status, None, None)
            .await?;
    info!(product_id = req.id, from = %existing.status, to = %req.status, "Listing status changed");
    Ok(WebResponse::ok(product.into()))
}

/// The caller's own listings, any status unless `status` is given
///
/// # Endpoint
/// `GET /api/product/mine`
async fn mine(
    ctx: RequestContext,
    params: Query<ProductSearchParams>,
) -> WebResult<WebResponse<PageResult<ProductInfo>>> {
    let mut params = params.into_inner();
    params.seller_id = Some(ctx.profile_id()?);
    let filter = product_filter(params, None).await?;
    Ok(WebResponse::ok(
        ProductRepository::page::<DatabaseConnection>(filter, None).await?,
    ))
}

/// Delete a listing
///
/// # Endpoint
/// `DELETE /api/product/{id}`
///
/// # Authorization
/// The seller, or a holder of `product:delete`
async fn delete(ctx: RequestContext, params: Path<PathId>) -> WebResult<WebResponse<bool>> {
    let grant = ctx.grant()?;
    let product = ProductRepository::find_by_id::<DatabaseConnection>(params.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Product.to_string()))?;

    if product.seller_id != grant.profile_id
        && !grant.has_permission(&permission_code(EntityType::Product, Operation::Delete))
    {
        return Err(WebError::Forbidden(
            "Only the seller can delete this listing".to_string(),
        ));
    }

    ProductRepository::delete::<DatabaseConnection>(params.id, None).await?;
    info!(product_id = params.id, by = grant.profile_id, "Listing deleted");
    Ok(WebResponse::ok(true))
}

/// Loads a listing and checks the caller sells it.
async fn find_owned(id: i32, profile_id: i32) -> WebResult<ProductModel> {
    let product = ProductRepository::find_by_id::<DatabaseConnection>(id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Product.to_string()))?;
    if product.seller_id != profile_id {
        return Err(WebError::Forbidden(
            "Only the seller can change this listing".to_string(),
        ));
    }
    Ok(product)
}

async fn ensure_category(category_id: Option<i32>) -> WebResult<()> {
    if let Some(id) = category_id {
        if !CategoryRepository::exists_by_id::<DatabaseConnection>(id, None).await? {
            return Err(WebError::BadRequest(format!("Category {id} does not exist")));
        }
    }
    Ok(())
}
