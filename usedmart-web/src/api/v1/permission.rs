//! Permission catalog API endpoints

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
        NewPermission, PageResult, PathId, PermissionInfo, PermissionPageParams, UpdatePermission,
    },
    enums::common::{EntityType, Operation},
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::PermissionRepository;

pub(super) const ROUTER_PREFIX: &str = "/permission";

/// Configure permission routes
///
/// # Routes
/// - POST ``: Create a permission
/// - PUT ``: Update a permission
/// - GET `/list`: Every permission
/// - GET `/page`: Paginated permissions
/// - GET `/detail/{id}`: One permission
/// - DELETE `/{id}`: Delete a permission
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/{id}", web::delete().to(delete));
}

#[inline]
#[instrument(name = "init-permission-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing permission module RBAC rules...");

    for path in ["/list", "/page", "/detail/{id}"] {
        perm_checker
            .register(
                Method::GET,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                has_permission(EntityType::Permission, Operation::Read)?,
            )
            .await?;
    }

    perm_checker
        .register(
            Method::POST,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Permission, Operation::Create)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Permission, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::DELETE,
            format!("{router_prefix}{ROUTER_PREFIX}/{{id}}"),
            has_permission(EntityType::Permission, Operation::Delete)?,
        )
        .await?;

    info!("Permission module RBAC rules initialized successfully");
    Ok(())
}

async fn list() -> WebResult<WebResponse<Vec<PermissionInfo>>> {
    Ok(WebResponse::ok(
        PermissionRepository::find_all::<DatabaseConnection>(None).await?,
    ))
}

async fn page(
    params: Query<PermissionPageParams>,
) -> WebResult<WebResponse<PageResult<PermissionInfo>>> {
    Ok(WebResponse::ok(
        PermissionRepository::page::<DatabaseConnection>(params.into_inner(), None).await?,
    ))
}

async fn get_by_id(params: Path<PathId>) -> WebResult<WebResponse<PermissionInfo>> {
    Ok(WebResponse::ok(
        PermissionRepository::find_info::<DatabaseConnection>(params.id, None)
            .await?
            .ok_or(WebError::NotFound(EntityType::Permission.to_string()))?,
    ))
}

/// Create a permission
///
/// # Endpoint
/// `POST /api/permission`
///
/// # Errors
/// - Bad Request (400): the code is not prefixed with its resource
/// - Conflict (409): the code is taken
async fn create(
    permission: Json<NewPermission>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<bool>> {
    let permission = permission.into_inner();
    check_code(&permission.code, permission.resource)?;

    let model = permission.into_active_model();
    state.validator.validate(&model, Operation::Create).await?;
    PermissionRepository::create::<DatabaseConnection>(model, None).await?;
    Ok(WebResponse::ok(true))
}

async fn update(
    permission: Json<UpdatePermission>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<bool>> {
    let permission = permission.into_inner();
    if !PermissionRepository::exists_by_id::<DatabaseConnection>(permission.id, None).await? {
        return Err(WebError::NotFound(EntityType::Permission.to_string()));
    }
    check_code(&permission.code, permission.resource)?;

    let model = permission.into_active_model();
    state.validator.validate(&model, Operation::Write).await?;
    PermissionRepository::update::<DatabaseConnection>(model, None).await?;
    // Cached grants hold permission codes.
    evict_all_grants().await?;
    Ok(WebResponse::ok(true))
}

async fn delete(params: Path<PathId>) -> WebResult<WebResponse<bool>> {
    if !PermissionRepository::exists_by_id::<DatabaseConnection>(params.id, None).await? {
        return Err(WebError::NotFound(EntityType::Permission.to_string()));
    }
    PermissionRepository::delete::<DatabaseConnection>(params.id, None).await?;
    evict_all_grants().await?;
    info!(permission_id = params.id, "Permission deleted");
    Ok(WebResponse::ok(true))
}

/// Codes read `resource:operation`.
fn check_code(code: &str, resource: EntityType) -> WebResult<()> {
    match code.split_once(':') {
        Some((prefix, operation)) if prefix == resource.as_str() && !operation.is_empty() => {
            Ok(())
        }
        _ => Err(WebError::BadRequest(format!(
            "Permission code must look like `{resource}:<operation>`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_code() {
        assert!(check_code("product:approve", EntityType::Product).is_ok());
        assert!(check_code("order:approve", EntityType::Product).is_err());
        assert!(check_code("product:", EntityType::Product).is_err());
        assert!(check_code("product", EntityType::Product).is_err());
    }
}
