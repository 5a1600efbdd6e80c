use actix_web_validator::Json;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};
use usedmart_common::UMAppContext;
use usedmart_error::{web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{Claims, LoginRequest, LoginResponse},
    enums::common::Status,
    web::WebResponse,
};
use usedmart_repository::ProfileRepository;
use usedmart_utils::{hash::bcrypt_check, jwt::encode_jwt};

pub(super) const ROUTER_PREFIX: &str = "/auth";

/// Login endpoint
///
/// # Endpoint
/// `POST /api/auth/login`
///
/// # Description
/// Exchanges a username and password for a bearer token. Unknown usernames
/// and wrong passwords answer the same way.
///
/// # Errors
/// - Unauthorized (401): bad credentials
/// - Forbidden (403): the profile is banned
#[instrument(name = "login", skip_all)]
pub async fn login(req: Json<LoginRequest>) -> WebResult<WebResponse<LoginResponse>> {
    let req = req.into_inner();
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(WebError::BadRequest(
            "username and password are required".to_string(),
        ));
    };

    let profile = ProfileRepository::find_by_username::<DatabaseConnection>(&username, None)
        .await?
        .ok_or(WebError::Unauthorized)?;

    if !bcrypt_check(&password, &profile.password) {
        warn!(%username, "Login rejected: wrong password");
        return Err(WebError::Unauthorized);
    }

    if profile.status == Status::Disabled {
        return Err(WebError::Forbidden("Account has been disabled".to_string()));
    }

    let settings = UMAppContext::instance().await?.settings()?.clone();
    let claims = Claims::new(
        settings.web.jwt.issuer.clone(),
        profile.id,
        profile.username.clone(),
        settings.web.jwt.expire,
    );

    let token = encode_jwt(&claims, settings.web.jwt.secret.as_bytes(), None)
        .map_err(|_| WebError::InternalError("Failed to encode JWT".to_string()))?;

    info!(profile_id = profile.id, "Profile logged in");
    Ok(WebResponse::ok(LoginResponse {
        token,
        profile_id: claims.profile_id,
        username: claims.username,
        iat: claims.iat,
        exp: claims.exp,
    }))
}
