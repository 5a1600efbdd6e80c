//! Role management API endpoints

use crate::{grant::evict_all_grants, rbac::has_permission, AppState};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use std::sync::Arc;
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        ChangeRoleStatus, NewRole, PageResult, PathId, RoleInfo, RoleMatrix, RolePageParams,
        RolePermissionPair, ToggleResult, UpdateRole,
    },
    entities::prelude::RoleModel,
    enums::{
        common::{EntityType, Operation},
        role::RoleType,
    },
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{PermissionRepository, RoleRepository};

pub(super) const ROUTER_PREFIX: &str = "/role";

/// Configure role routes
///
/// # Routes
/// - GET `/list`: Retrieve a list of all roles
/// - GET `/page`: Retrieve paginated list of roles
/// - GET `/detail/{id}`: Retrieve role details by ID
/// - POST ``: Create a new role
/// - PUT ``: Update role information
/// - DELETE `/{id}`: Delete role
/// - PUT `/change-status`: Change role status
/// - GET `/matrix`: Roles, permissions and every grant between them
/// - PUT `/permission/toggle`: Grant or revoke one permission of a role
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/change-status", web::put().to(change_status))
        .route("/matrix", web::get().to(matrix))
        .route("/permission/toggle", web::put().to(toggle_permission))
        .route("/{id}", web::delete().to(delete));
}

/// Initialize RBAC rules for role module
///
/// # Parameters
/// - `router_prefix`: Base URL prefix for all routes
/// - `perm_checker`: Permission checker instance for registering rules
///
/// # Returns
/// - `WebResult<()>`: Success or error result
#[inline]
#[instrument(name = "init-role-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing role module RBAC rules...");

    for path in ["/list", "/page", "/detail/{id}", "/matrix"] {
        perm_checker
            .register(
                Method::GET,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                has_permission(EntityType::Role, Operation::Read)?,
            )
            .await?;
    }

    perm_checker
        .register(
            Method::POST,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Role, Operation::Create)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Role, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}/change-status"),
            has_permission(EntityType::Role, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}/permission/toggle"),
            has_permission(EntityType::Role, Operation::Assign)?,
        )
        .await?;

    perm_checker
        .register(
            Method::DELETE,
            format!("{router_prefix}{ROUTER_PREFIX}/{{id}}"),
            has_permission(EntityType::Role, Operation::Delete)?,
        )
        .await?;

    info!("Role module RBAC rules initialized successfully");
    Ok(())
}

/// Retrieve a list of all roles
///
/// # Endpoint
/// `GET /api/role/list`
async fn list() -> WebResult<WebResponse<Vec<RoleInfo>>> {
    Ok(WebResponse::ok(
        RoleRepository::find_all::<DatabaseConnection>(None).await?,
    ))
}

/// Retrieve paginated list of roles
///
/// # Endpoint
/// `GET /api/role/page`
///
/// # Parameters
/// - `page`, `pageSize`
/// - `name`, `code`: substring filters
/// - `status`: optional status filter
async fn page(params: Query<RolePageParams>) -> WebResult<WebResponse<PageResult<RoleInfo>>> {
    Ok(WebResponse::ok(
        RoleRepository::page::<DatabaseConnection>(params.into_inner(), None).await?,
    ))
}

/// Retrieve role details by ID
///
/// # Endpoint
/// `GET /api/role/detail/{id}`
///
/// # Errors
/// - Not Found (404): When role is not found
async fn get_by_id(params: Path<PathId>) -> WebResult<WebResponse<RoleInfo>> {
    Ok(WebResponse::ok(
        RoleRepository::find_role_info::<DatabaseConnection>(params.id, None)
            .await?
            .ok_or(WebError::NotFound(EntityType::Role.to_string()))?,
    ))
}

/// Create a new role
///
/// # Endpoint
/// `POST /api/role`
///
/// # Errors
/// - Bad Request (400): When role data is invalid
/// - Conflict (409): When the code is taken
async fn create(
    role: Json<NewRole>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<bool>> {
    let model = role.into_inner().into_active_model();
    state.validator.validate(&model, Operation::Create).await?;
    RoleRepository::create::<DatabaseConnection>(model, None).await?;
    Ok(WebResponse::ok(true))
}

/// Update role information
///
/// # Endpoint
/// `PUT /api/role`
///
/// # Errors
/// - Bad Request (400): When the role is built in
/// - Not Found (404): When role is not found
async fn update(
    role: Json<UpdateRole>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<bool>> {
    let role = role.into_inner();
    ensure_custom(role.id, "Cannot modify built-in role").await?;

    let model = role.into_active_model();
    state.validator.validate(&model, Operation::Write).await?;
    RoleRepository::update::<DatabaseConnection>(model, None).await?;
    Ok(WebResponse::ok(true))
}

/// Delete role
///
/// # Endpoint
/// `DELETE /api/role/{id}`
///
/// # Description
/// Profiles holding the role are left without one.
async fn delete(params: Path<PathId>) -> WebResult<WebResponse<bool>> {
    ensure_custom(params.id, "Cannot delete built-in role").await?;
    RoleRepository::delete::<DatabaseConnection>(params.id, None).await?;
    evict_all_grants().await?;
    info!(role_id = params.id, "Role deleted");
    Ok(WebResponse::ok(true))
}

/// Change role status
///
/// # Endpoint
/// `PUT /api/role/change-status`
///
/// # Description
/// A disabled role grants nothing to the profiles holding it.
async fn change_status(req: Json<ChangeRoleStatus>) -> WebResult<WebResponse<bool>> {
    let req = req.into_inner();
    ensure_custom(req.id, "Cannot change status of built-in role").await?;
    RoleRepository::update::<DatabaseConnection>(req.into_active_model(), None).await?;
    evict_all_grants().await?;
    Ok(WebResponse::ok(true))
}

/// Role/permission matrix
///
/// # Endpoint
/// `GET /api/role/matrix`
async fn matrix() -> WebResult<WebResponse<RoleMatrix>> {
    Ok(WebResponse::ok(RoleMatrix {
        roles: RoleRepository::find_all::<DatabaseConnection>(None).await?,
        permissions: PermissionRepository::find_all::<DatabaseConnection>(None).await?,
        grants: RoleRepository::find_grant_pairs::<DatabaseConnection>(None).await?,
    }))
}

/// Flip one cell of the matrix
///
/// # Endpoint
/// `PUT /api/role/permission/toggle`
///
/// # Returns
/// The pair and whether the role holds the permission afterwards.
#[instrument(name = "toggle-role-permission", skip_all, fields(role_id = pair.role_id, permission_id = pair.permission_id))]
async fn toggle_permission(
    pair: Json<RolePermissionPair>,
) -> WebResult<WebResponse<ToggleResult>> {
    let pair = pair.into_inner();
    if !RoleRepository::exists_by_id::<DatabaseConnection>(pair.role_id, None).await? {
        return Err(WebError::NotFound(EntityType::Role.to_string()));
    }
    if !PermissionRepository::exists_by_id::<DatabaseConnection>(pair.permission_id, None).await? {
        return Err(WebError::NotFound(EntityType::Permission.to_string()));
    }

    let granted = RoleRepository::toggle_permission::<DatabaseConnection>(pair, None).await?;
    evict_all_grants().await?;
    info!(granted, "Role permission toggled");
    Ok(WebResponse::ok(ToggleResult {
        role_id: pair.role_id,
        permission_id: pair.permission_id,
        granted,
    }))
}

/// Loads a role and refuses built-in ones with `message`.
async fn ensure_custom(id: i32, message: &str) -> WebResult<RoleModel> {
    let role = RoleRepository::find_by_id::<DatabaseConnection>(id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Role.to_string()))?;
    if role.r#type == RoleType::BuiltIn {
        return Err(WebError::BadRequest(message.to_string()));
    }
    Ok(role)
}
