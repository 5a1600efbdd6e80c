//! Profile API endpoints: self-service for every member, management for
//! administrators.

use crate::{
    grant::evict_grant,
    middleware::RequestContext,
    rbac::{has_permission, is_authenticated},
    AppState,
};
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path, Query};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use std::sync::Arc;
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{
        AssignProfileRole, ChangePassword, ChangeProfilePassword, ChangeProfileStatus,
        NewProfile, PageResult, PathId, ProfileDetail, ProfileInfo, ProfilePageParams,
        UpdateMyProfile,
    },
    enums::common::{EntityType, Operation, Status},
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::{ProfileRepository, RoleRepository};
use usedmart_utils::hash::{bcrypt_check, bcrypt_hash};

pub(super) const ROUTER_PREFIX: &str = "/profile";

/// Configure profile routes
///
/// # Routes
/// - GET `/me`: The caller's profile, role and permissions
/// - PUT `/me`: Edit the caller's profile
/// - PUT `/change-password`: Change the caller's password
/// - GET `/page`: Paginated profiles
/// - GET `/detail/{id}`: One profile with its role
/// - POST ``: Create a profile
/// - PUT `/change-status`: Ban or unban a profile
/// - PUT `/assign-role`: Set or clear a profile's role
/// - DELETE `/{id}`: Delete a profile
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me))
        .route("/me", web::put().to(update_me))
        .route("/change-password", web::put().to(change_password))
        .route("", web::post().to(create))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/change-status", web::put().to(change_status))
        .route("/assign-role", web::put().to(assign_role))
        .route("/{id}", web::delete().to(delete));
}

/// Initialize RBAC rules for profile module
///
/// # Parameters
/// - `router_prefix`: Base URL prefix for all routes
/// - `perm_checker`: Permission checker instance for registering rules
#[inline]
#[instrument(name = "init-profile-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing profile module RBAC rules...");

    for (method, path) in [
        (Method::GET, "/me"),
        (Method::PUT, "/me"),
        (Method::PUT, "/change-password"),
    ] {
        perm_checker
            .register(
                method,
                format!("{router_prefix}{ROUTER_PREFIX}{path}"),
                is_authenticated()?,
            )
            .await?;
    }

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/page"),
            has_permission(EntityType::Profile, Operation::Read)?,
        )
        .await?;

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/detail/{{id}}"),
            has_permission(EntityType::Profile, Operation::Read)?,
        )
        .await?;

    perm_checker
        .register(
            Method::POST,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Profile, Operation::Create)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}/change-status"),
            has_permission(EntityType::Profile, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}/assign-role"),
            has_permission(EntityType::Profile, Operation::Assign)?,
        )
        .await?;

    perm_checker
        .register(
            Method::DELETE,
            format!("{router_prefix}{ROUTER_PREFIX}/{{id}}"),
            has_permission(EntityType::Profile, Operation::Delete)?,
        )
        .await?;

    info!("Profile module RBAC rules initialized successfully");
    Ok(())
}

/// Retrieve the caller's profile
///
/// # Endpoint
/// `GET /api/profile/me`
///
/// # Returns
/// The profile together with the role and permission codes the caller's
/// requests are authorized with.
async fn me(ctx: RequestContext) -> WebResult<WebResponse<ProfileDetail>> {
    let grant = ctx.grant()?;
    let profile = ProfileRepository::find_info::<DatabaseConnection>(grant.profile_id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Profile.to_string()))?;
    Ok(WebResponse::ok(ProfileDetail {
        profile,
        role: grant.role.clone(),
        permissions: grant.permissions.clone(),
    }))
}

async fn update_me(
    ctx: RequestContext,
    req: Json<UpdateMyProfile>,
) -> WebResult<WebResponse<ProfileInfo>> {
    let model = req.into_inner().with_id(ctx.profile_id()?).into_active_model();
    let updated = ProfileRepository::update::<DatabaseConnection>(model, None).await?;
    Ok(WebResponse::ok(updated.into()))
}

/// Change the caller's password
///
/// # Endpoint
/// `PUT /api/profile/change-password`
///
/// # Errors
/// - Bad Request (400): the old password does not match
#[instrument(name = "change-password", skip_all)]
async fn change_password(
    ctx: RequestContext,
    req: Json<ChangePassword>,
) -> WebResult<WebResponse<bool>> {
    let profile_id = ctx.profile_id()?;
    let req = req.into_inner();
    let (Some(old_password), Some(new_password)) = (req.old_password, req.new_password) else {
        return Err(WebError::BadRequest(
            "Old and new password are required".to_string(),
        ));
    };

    let profile = ProfileRepository::find_by_id::<DatabaseConnection>(profile_id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Profile.to_string()))?;
    if !bcrypt_check(&old_password, &profile.password) {
        return Err(WebError::BadRequest("Old password is incorrect".to_string()));
    }

    let model = ChangeProfilePassword {
        id: profile_id,
        password: hash_password(&new_password)?,
    }
    .into_active_model();
    ProfileRepository::update::<DatabaseConnection>(model, None).await?;
    info!(profile_id, "Password changed");
    Ok(WebResponse::ok(true))
}

async fn page(params: Query<ProfilePageParams>) -> WebResult<WebResponse<PageResult<ProfileInfo>>> {
    Ok(WebResponse::ok(
        ProfileRepository::page::<DatabaseConnection>(params.into_inner(), None).await?,
    ))
}

/// `GET /api/profile/detail/{id}`. Reads the role straight from the store,
/// not from the grant cache.
async fn get_by_id(params: Path<PathId>) -> WebResult<WebResponse<ProfileDetail>> {
    let profile = ProfileRepository::find_info::<DatabaseConnection>(params.id, None)
        .await?
        .ok_or(WebError::NotFound(EntityType::Profile.to_string()))?;
    let (role, permissions) = match profile.role_id {
        Some(role_id) => RoleRepository::find_grant::<DatabaseConnection>(role_id, None)
            .await?
            .map(|(role, permissions)| (Some(role), permissions))
            .unwrap_or_default(),
        None => (None, Vec::new()),
    };
    Ok(WebResponse::ok(ProfileDetail {
        profile,
        role,
        permissions,
    }))
}

/// Create a profile
///
/// # Endpoint
/// `POST /api/profile`
///
/// # Errors
/// - Bad Request (400): unknown role
/// - Conflict (409): username taken
#[instrument(name = "create-profile", skip_all)]
async fn create(
    req: Json<NewProfile>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<ProfileInfo>> {
    let mut profile = req.into_inner();
    if let Some(role_id) = profile.role_id {
        ensure_role(role_id).await?;
    }
    profile.password = hash_password(&profile.password)?;

    let model = profile.into_active_model();
    state.validator.validate(&model, Operation::Create).await?;
    let created = ProfileRepository::create::<DatabaseConnection>(model, None).await?;
    info!(profile_id = created.id, username = %created.username, "Profile created");
    Ok(WebResponse::ok(created.into()))
}

/// Ban or unban a profile
///
/// # Endpoint
/// `PUT /api/profile/change-status`
///
/// # Description
/// A banned profile is refused on its next request, the cached grant is
/// dropped here.
async fn change_status(
    ctx: RequestContext,
    req: Json<ChangeProfileStatus>,
) -> WebResult<WebResponse<bool>> {
    let req = req.into_inner();
    if req.id == ctx.profile_id()? && req.status == Status::Disabled {
        return Err(WebError::BadRequest(
            "You cannot disable your own account".to_string(),
        ));
    }
    ensure_profile(req.id).await?;

    let id = req.id;
    ProfileRepository::update::<DatabaseConnection>(req.into_active_model(), None).await?;
    evict_grant(id).await?;
    info!(profile_id = id, "Profile status changed");
    Ok(WebResponse::ok(true))
}

/// Set or clear a profile's role
///
/// # Endpoint
/// `PUT /api/profile/assign-role`
async fn assign_role(
    ctx: RequestContext,
    req: Json<AssignProfileRole>,
) -> WebResult<WebResponse<bool>> {
    let req = req.into_inner();
    if req.id == ctx.profile_id()? {
        return Err(WebError::BadRequest(
            "You cannot change your own role".to_string(),
        ));
    }
    ensure_profile(req.id).await?;
    if let Some(role_id) = req.role_id {
        ensure_role(role_id).await?;
    }

    let id = req.id;
    ProfileRepository::update::<DatabaseConnection>(req.into_active_model(), None).await?;
    evict_grant(id).await?;
    info!(profile_id = id, "Profile role changed");
    Ok(WebResponse::ok(true))
}

async fn delete(ctx: RequestContext, params: Path<PathId>) -> WebResult<WebResponse<bool>> {
    if params.id == ctx.profile_id()? {
        return Err(WebError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    ensure_profile(params.id).await?;

    ProfileRepository::delete::<DatabaseConnection>(params.id, None).await?;
    evict_grant(params.id).await?;
    info!(profile_id = params.id, "Profile deleted");
    Ok(WebResponse::ok(true))
}

#[inline]
fn hash_password(password: &str) -> WebResult<String> {
    bcrypt_hash(password)
        .map_err(|e| WebError::InternalError(format!("Failed to hash password: {e}")))
}

async fn ensure_profile(id: i32) -> WebResult<()> {
    if !ProfileRepository::exists_by_id::<DatabaseConnection>(id, None).await? {
        return Err(WebError::NotFound(EntityType::Profile.to_string()));
    }
    Ok(())
}

async fn ensure_role(role_id: i32) -> WebResult<()> {
    if !RoleRepository::exists_by_id::<DatabaseConnection>(role_id, None).await? {
        return Err(WebError::BadRequest(format!("Role {role_id} does not exist")));
    }
    Ok(())
}
