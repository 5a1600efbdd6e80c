//! Category management API endpoints

use crate::{rbac::has_permission, AppState};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use std::sync::Arc;
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        CategoryInfo, CategoryPageParams, CategoryTree, ChangeCategoryStatus, NewCategory,
        PageResult, PathId, UpdateCategory,
    },
    enums::common::{EntityType, Operation},
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::CategoryRepository;

pub(super) const ROUTER_PREFIX: &str = "/category";

/// Configure category routes
///
/// # Routes
/// - POST ``: Create a category
/// - PUT ``: Update a category
/// - GET `/list`: Every category, flat
/// - GET `/tree`: Every category, nested
/// - GET `/page`: Paginated categories
/// - GET `/detail/{id}`: One category
/// - PUT `/change-status`: Enable or disable a category
/// - DELETE `/{id}`: Delete a leaf category
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/tree", web::get().to(tree))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/change-status", web::put().to(change_status))
        .route("/{id}", web::delete().to(delete));
}

#[inline]
#[instrument(name = "init-category-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing category module RBAC rules...");

    for path in ["/list", "/tree", "/page", "/detail/{id}"] {
        perm_checker
            .register(
                Method::GET,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                has_permission(EntityType::Category, Operation::Read)?,
            )
            .await?;
    }

    perm_checker
        .register(
            Method::POST,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Category, Operation::Create)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Category, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}/change-status"),
            has_permission(EntityType::Category, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::DELETE,
            format!("{router_prefix}{ROUTER_PREFIX}/{{id}}"),
            has_permission(EntityType::Category, Operation::Delete)?,
        )
        .await?;

    info!("Category module RBAC rules initialized successfully");
    Ok(())
}

async fn list() -> WebResult<WebResponse<Vec<CategoryInfo>>> {
    Ok(WebResponse::ok(
        CategoryRepository::find_all::<DatabaseConnection>(false, None).await?,
    ))
}

async fn tree() -> WebResult<WebResponse<Vec<CategoryTree>>> {
    Ok(WebResponse::ok(
        CategoryRepository::find_tree::<DatabaseConnection>(false, None).await?,
    ))
}

async fn page(
    params: Query<CategoryPageParams>,
) -> WebResult<WebResponse<PageResult<CategoryInfo>>> {
    Ok(WebResponse::ok(
        CategoryRepository::page::<DatabaseConnection>(params.into_inner(), None).await?,
    ))
}

async fn get_by_id(params: Path<PathId>) -> WebResult<WebResponse<CategoryInfo>> {
    Ok(WebResponse::ok(
        CategoryRepository::find_info::<DatabaseConnection>(params.id, None)
            .await?
            .ok_or(WebError::NotFound(EntityType::Category.to_string()))?,
    ))
}

/// Create a category
///
/// # Endpoint
/// `POST /api/category`
///
/// # Errors
/// - Bad Request (400): unknown parent
/// - Conflict (409): slug already taken
async fn create(
    category: Json<NewCategory>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<CategoryInfo>> {
    let category = category.into_inner();
    if let Some(parent_id) = category.parent_id {
        ensure_parent(parent_id).await?;
    }

    let model = category.into_active_model();
    state.validator.validate(&model, Operation::Create).await?;
    let created = CategoryRepository::create::<DatabaseConnection>(model, None).await?;
    info!(category_id = created.id, slug = %created.slug, "Category created");
    Ok(WebResponse::ok(created.into()))
}

/// Update a category
///
/// # Endpoint
/// `PUT /api/category`
///
/// # Errors
/// - Bad Request (400): the new parent is the category itself or one of its
///   descendants
/// - Not Found (404): unknown category
/// - Conflict (409): slug already taken
async fn update(
    category: Json<UpdateCategory>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<bool>> {
    let category = category.into_inner();
    if !CategoryRepository::exists_by_id::<DatabaseConnection>(category.id, None).await? {
        return Err(WebError::NotFound(EntityType::Category.to_string()));
    }

    if let Some(Some(parent_id)) = category.parent_id {
        let subtree =
            CategoryRepository::find_descendant_ids::<DatabaseConnection>(category.id, None)
                .await?;
        if subtree.contains(&parent_id) {
            return Err(WebError::BadRequest(
                "A category cannot be moved under itself".to_string(),
            ));
        }
        ensure_parent(parent_id).await?;
    }

    let model = category.into_active_model();
    state.validator.validate(&model, Operation::Write).await?;
    CategoryRepository::update::<DatabaseConnection>(model, None).await?;
    Ok(WebResponse::ok(true))
}

async fn change_status(req: Json<ChangeCategoryStatus>) -> WebResult<WebResponse<bool>> {
    let req = req.into_inner();
    if !CategoryRepository::exists_by_id::<DatabaseConnection>(req.id, None).await? {
        return Err(WebError::NotFound(EntityType::Category.to_string()));
    }
    CategoryRepository::update::<DatabaseConnection>(req.into_active_model(), None).await?;
    Ok(WebResponse::ok(true))
}

/// Delete a category
///
/// # Endpoint
/// `DELETE /api/category/{id}`
///
/// # Errors
/// - Bad Request (400): the category still has children
/// - Not Found (404): unknown category
async fn delete(params: Path<PathId>) -> WebResult<WebResponse<bool>> {
    if !CategoryRepository::exists_by_id::<DatabaseConnection>(params.id, None).await? {
        return Err(WebError::NotFound(EntityType::Category.to_string()));
    }
    if CategoryRepository::has_children::<DatabaseConnection>(params.id, None).await? {
        return Err(WebError::BadRequest(
            "Delete or move the subcategories first".to_string(),
        ));
    }
    CategoryRepository::delete::<DatabaseConnection>(params.id, None).await?;
    Ok(WebResponse::ok(true))
}

async fn ensure_parent(parent_id: i32) -> WebResult<()> {
    if !CategoryRepository::exists_by_id::<DatabaseConnection>(parent_id, None).await? {
        return Err(WebError::BadRequest(format!(
            "Parent category {parent_id} does not exist"
        )));
    }
    Ok(())
}
