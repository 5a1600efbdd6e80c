use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "username is required"))]
    pub username: Option<String>,
    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub profile_id: i32,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Bearer token payload.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub jti: String,
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    pub profile_id: i32,
    pub username: String,
}

impl Claims {
    /// `ttl` is in seconds.
    pub fn new(iss: String, profile_id: i32, username: String, ttl: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            jti: Uuid::new_v4().to_string(),
            sub: profile_id.to_string(),
            iss,
            exp: now + ttl,
            nbf: now,
            iat: now,
            profile_id,
            username,
        }
    }
}
