use crate::{middleware::RequestContext, rbac::is_authenticated};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        AddFavorite, FavoriteCheck, FavoriteCheckParams, FavoritePageParams, FavoriteProduct,
        PageResult,
    },
    enums::common::EntityType,
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{FavoriteRepository, ProductRepository};

pub(super) const ROUTER_PREFIX: &str = "/favorite";

/// Configure favorite routes
///
/// # Routes
/// - POST ``: Bookmark a listing, idempotent
/// - DELETE `/{productId}`: Remove a bookmark
/// - GET `/list`: The caller's bookmarks, newest first
/// - GET `/check/{productId}`: Whether the caller bookmarked a listing
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(add))
        .route("/list", web::get().to(list))
        .route("/check/{productId}", web::get().to(check))
        .route("/{productId}", web::delete().to(remove));
}

/// Any signed-in profile. Rows are scoped to the caller inside the handlers.
#[inline]
#[instrument(name = "init-favorite-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing favorite module RBAC rules...");

    for (method, path) in [
        (Method::POST, ""),
        (Method::GET, "/list"),
        (Method::GET, "/check/{productId}"),
        (Method::DELETE, "/{productId}"),
    ] {
        perm_checker
            .register(
                method,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                is_authenticated()?,
            )
            .await?;
    }

    info!("Favorite module RBAC rules initialized successfully");
    Ok(())
}

/// `POST /api/favorite`. Answers `true` when a new bookmark was stored and
/// `false` when it already existed.
async fn add(ctx: RequestContext, req: Json<AddFavorite>) -> WebResult<WebResponse<bool>> {
    let profile_id = ctx.profile_id()?;
    if ProductRepository::find_by_id::<DatabaseConnection>(req.product_id, None)
        .await?
        .is_none()
    {
        return Err(WebError::NotFound(EntityType::Product.to_string()));
    }

    let added =
        FavoriteRepository::add::<DatabaseConnection>(profile_id, req.product_id, None).await?;
    debug!(profile_id, product_id = req.product_id, added, "Favorite added");
    Ok(WebResponse::ok(added))
}

async fn remove(
    ctx: RequestContext,
    params: Path<FavoriteCheckParams>,
) -> WebResult<WebResponse<bool>> {
    let removed = FavoriteRepository::remove::<DatabaseConnection>(
        ctx.profile_id()?,
        params.product_id,
        None,
    )
    .await?;
    Ok(WebResponse::ok(removed > 0))
}

async fn list(
    ctx: RequestContext,
    params: Query<FavoritePageParams>,
) -> WebResult<WebResponse<PageResult<FavoriteProduct>>> {
    Ok(WebResponse::ok(
        FavoriteRepository::page_products::<DatabaseConnection>(
            ctx.profile_id()?,
            params.into_inner().page,
            None,
        )
        .await?,
    ))
}

async fn check(
    ctx: RequestContext,
    params: Path<FavoriteCheckParams>,
) -> WebResult<WebResponse<FavoriteCheck>> {
    let favorited = FavoriteRepository::exists::<DatabaseConnection>(
        ctx.profile_id()?,
        params.product_id,
        None,
    )
    .await?;
    Ok(WebResponse::ok(FavoriteCheck {
        product_id: params.product_id,
        favorited,
    }))
}
