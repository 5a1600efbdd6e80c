//! Public storefront: browsing listings, categories and public settings.
//!
//! Nothing here requires a token. The product detail endpoint still reads an
//! optional bearer token so sellers viewing their own listing are not counted.

use super::product_filter;
use crate::{middleware::auth::optional_profile_id, visitor, AppState};
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_validator::{Path, Query};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{instrument, warn};
use usedmart_common::UMAppContext;
use usedmart_core::ViewRequest;
use usedmart_error::{web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        CategoryTree, PageResult, PathId, ProductDetail, ProductInfo, ProductSearchParams,
        SystemSettingInfo,
    },
    enums::{common::EntityType, product::ProductStatus},
    web::WebResponse,
};
use usedmart_repository::{
    CategoryRepository, ProductRepository, ProfileRepository, SettingsRepository,
};

pub(super) const ROUTER_PREFIX: &str = "/catalog";

/// Configure catalog routes
///
/// # Routes
/// - GET `/product/page`: Active listings, filtered and sorted
/// - GET `/product/detail/{id}`: One listing, counting the view
/// - GET `/category/tree`: Enabled categories as a tree
/// - GET `/settings`: Public system settings
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/product/page", web::get().to(page))
        .route("/product/detail/{id}", web::get().to(detail))
        .route("/category/tree", web::get().to(category_tree))
        .route("/settings", web::get().to(public_settings));
}

/// Retrieve a page of active listings
///
/// # Endpoint
/// `GET /api/catalog/product/page`
///
/// # Parameters
/// - `category`: category id, its descendants are included
/// - `search`: matched against title and description
/// - `sort`: `newest` (default), `oldest`, `price_asc`, `price_desc`, `popular`
/// - `condition`, `minPrice`, `maxPrice`, `sellerId`, `page`, `pageSize`
async fn page(
    params: Query<ProductSearchParams>,
) -> WebResult<WebResponse<PageResult<ProductInfo>>> {
    let filter = product_filter(params.into_inner(), Some(vec![ProductStatus::Active])).await?;
    Ok(WebResponse::ok(
        ProductRepository::page::<DatabaseConnection>(filter, None).await?,
    ))
}

/// Retrieve one listing with its seller and category
///
/// # Endpoint
/// `GET /api/catalog/product/detail/{id}`
///
/// # Description
/// Counts at most one view per browser and listing. Browsers without the
/// visitor cookie receive one with the response.
///
/// # Errors
/// - Not Found (404): unknown listing, or a listing that is not active and
///   is requested by someone other than its seller
#[instrument(name = "catalog-detail", skip(req, params, state), fields(product_id = params.id))]
async fn detail(
    req: HttpRequest,
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<HttpResponse> {
    let product = ProductRepository::find_by_id::<DatabaseConnection>(params.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Product.to_string()))?;

    let viewer_id = optional_profile_id(&req).await;
    if product.status != ProductStatus::Active && viewer_id != Some(product.seller_id) {
        return Err(WebError::NotFound(EntityType::Product.to_string()));
    }

    let cookie_config = UMAppContext::instance()
        .await?
        .settings()?
        .web
        .visitor_cookie
        .clone();
    let visitor = visitor::resolve(&req, &cookie_config);

    let outcome = state
        .view_gate
        .record_view(ViewRequest {
            product_id: product.id,
            owner_id: product.seller_id,
            viewer_id,
            status: product.status,
            current_count: product.view_count,
            visitor: visitor.id.clone(),
        })
        .await;
    let view_count = match outcome {
        Ok(outcome) => outcome.visible_count(product.view_count),
        Err(e) => {
            // A lost view must not fail the page.
            warn!(product_id = product.id, error = %e, "Failed to record product view");
            product.view_count
        }
    };

    let seller = ProfileRepository::find_brief::<DatabaseConnection>(product.seller_id, None).await?;
    let category = match product.category_id {
        Some(id) => CategoryRepository::find_info::<DatabaseConnection>(id, None).await?,
        None => None,
    };

    let mut info = ProductInfo::from(product);
    info.view_count = view_count;
    let body = WebResponse::ok(ProductDetail {
        product: info,
        seller,
        category,
    });

    let mut response = HttpResponse::Ok();
    if let Some(cookie) = visitor.new_cookie {
        response.cookie(cookie);
    }
    Ok(response.json(body))
}

/// `GET /api/catalog/category/tree`
async fn category_tree() -> WebResult<WebResponse<Vec<CategoryTree>>> {
    Ok(WebResponse::ok(
        CategoryRepository::find_tree::<DatabaseConnection>(true, None).await?,
    ))
}

/// `GET /api/catalog/settings`
async fn public_settings() -> WebResult<WebResponse<Vec<SystemSettingInfo>>> {
    Ok(WebResponse::ok(
        SettingsRepository::find_public::<DatabaseConnection>(None).await?,
    ))
}
