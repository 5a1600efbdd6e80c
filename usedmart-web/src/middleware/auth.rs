//! Bearer token authentication.
//!
//! Decodes the JWT, loads the caller's grant snapshot and attaches both to the
//! request extensions for the permission middleware and the handlers.

use crate::grant::load_grant;
use actix_service::{Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    http::{
        header::{HeaderMap, AUTHORIZATION},
        Method,
    },
    Error, HttpMessage, HttpRequest, HttpResponse,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use jsonwebtoken::{Algorithm, Validation};
use std::{
    cell::RefCell,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::warn;
use usedmart_common::UMAppContext;
use usedmart_error::web::WebError;
use usedmart_models::{
    constants::BEARER_TOKEN, domain::prelude::Claims, settings::Settings, web::WebResponse,
};
use usedmart_utils::jwt::decode_jwt;

pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(RefCell::new(service)),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: Rc<RefCell<S>>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        async move {
            if Method::OPTIONS == req.method() {
                return srv.call(req).await.map(|res| res.map_into_left_body());
            }

            let settings = get_settings().await?;
            let claims = extract_bearer_token(req.headers())
                .and_then(|token| decode_claims(token, &settings));
            let claims = match claims {
                Some(claims) => claims,
                None => {
                    return Ok(req
                        .into_response(HttpResponse::Unauthorized().json(
                            WebResponse::<()>::error("Invalid token, please login again"),
                        ))
                        .map_into_right_body())
                }
            };

            let grant = match load_grant(claims.profile_id).await {
                Ok(grant) => grant,
                // The profile was deleted after the token was issued.
                Err(WebError::NotFound(_)) => {
                    return Ok(req
                        .into_response(HttpResponse::Unauthorized().json(
                            WebResponse::<()>::error("Invalid token, please login again"),
                        ))
                        .map_into_right_body())
                }
                Err(e) => return Err(ErrorInternalServerError(e.to_string())),
            };

            if grant.is_disabled() {
                warn!(profile_id = grant.profile_id, "Rejected request from banned profile");
                return Ok(req
                    .into_response(
                        HttpResponse::Forbidden()
                            .json(WebResponse::<()>::error("Account has been disabled")),
                    )
                    .map_into_right_body());
            }

            req.extensions_mut().insert(Arc::new(grant));

            srv.call(req).await.map(|res| res.map_into_left_body())
        }
        .boxed_local()
    }
}

#[inline]
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_TOKEN)
        .map(str::trim)
}

fn decode_claims(token: &str, settings: &Settings) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.set_issuer(&[&settings.web.jwt.issuer]);

    decode_jwt::<Claims>(token, settings.web.jwt.secret.as_bytes(), Some(validation))
        .map(|data| data.claims)
        .ok()
}

/// Profile id of the caller when the request carries a valid token.
///
/// A missing or bad token reads as anonymous.
pub(crate) async fn optional_profile_id(req: &HttpRequest) -> Option<i32> {
    let settings = get_settings().await.ok()?;
    let token = extract_bearer_token(req.headers())?;
    decode_claims(token, &settings).map(|claims| claims.profile_id)
}

#[inline]
async fn get_settings() -> Result<Settings, Error> {
    let ctx = UMAppContext::instance()
        .await
        .map_err(ErrorInternalServerError)?;
    ctx.settings().map_err(ErrorInternalServerError).cloned()
}
