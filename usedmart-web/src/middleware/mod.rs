pub(crate) mod auth;
pub(crate) mod cors;
pub(crate) mod perm;

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use std::sync::Arc;
use usedmart_error::{web::WebError, WebResult};
use usedmart_models::cache::UserGrant;

/// Identity attached by [`auth::Authentication`].
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub grant: Option<Arc<UserGrant>>,
}

impl RequestContext {
    /// The caller's grant. Fails on routes that skipped authentication.
    pub fn grant(&self) -> WebResult<Arc<UserGrant>> {
        self.grant.clone().ok_or(WebError::Unauthorized)
    }

    #[inline]
    pub fn profile_id(&self) -> WebResult<i32> {
        self.grant
            .as_ref()
            .map(|grant| grant.profile_id)
            .ok_or(WebError::Unauthorized)
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(RequestContext {
            grant: req.extensions().get::<Arc<UserGrant>>().cloned(),
        }))
    }
}
