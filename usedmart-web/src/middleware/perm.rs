//! Route-level authorization against the rules registered at startup.

use actix_service::{Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    Error, HttpMessage, HttpResponse,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use std::{
    cell::RefCell,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::debug;
use usedmart_common::{UMAppContext, UMPermChecker};
use usedmart_error::UMError;
use usedmart_models::{cache::UserGrant, web::WebResponse, PermChecker};

#[derive(Clone)]
pub struct PermService;

impl<S, B> Transform<S, ServiceRequest> for PermService
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = PermMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(PermMiddleware {
            service: Rc::new(RefCell::new(service)),
        })
    }
}

/// Looks up the rule for `(method, matched route pattern)` and evaluates it
/// against the grant placed by the authentication middleware.
#[derive(Clone)]
pub struct PermMiddleware<S> {
    service: Rc<RefCell<S>>,
}

impl<S, B> Service<ServiceRequest> for PermMiddleware<S>
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
            let path = req.match_pattern().unwrap_or_default();
            let method = req.method().as_str().to_string();
            let grant = req.extensions().get::<Arc<UserGrant>>().cloned();
            let grant = match grant {
                Some(grant) => grant,
                None => {
                    return Ok(req.into_response(
                        HttpResponse::Unauthorized()
                            .json(WebResponse::<()>::error("Authentication required"))
                            .map_into_right_body(),
                    ))
                }
            };

            let perm_checker = get_perm_checker().await?;
            match perm_checker.check(&method, &path, grant.clone()).await {
                Ok(true) => srv.call(req).await.map(|res| res.map_into_left_body()),
                Ok(false) => {
                    debug!(profile_id = grant.profile_id, %method, %path, "Permission denied");
                    Ok(req.into_response(
                        HttpResponse::Forbidden()
                            .json(WebResponse::<()>::error("Permission denied"))
                            .map_into_right_body(),
                    ))
                }
                Err(e) => Ok(req.into_response(
                    HttpResponse::InternalServerError()
                        .json(WebResponse::<()>::error(&e.to_string()))
                        .map_into_right_body(),
                )),
            }
        }
        .boxed_local()
    }
}

async fn get_perm_checker() -> Result<Arc<UMPermChecker>, Error> {
    let ctx = UMAppContext::instance()
        .await
        .map_err(ErrorInternalServerError)?;
    let checker = ctx.perm_checker().map_err(ErrorInternalServerError)?;
    checker
        .downcast_arc::<UMPermChecker>()
        .map_err(|_| ErrorInternalServerError(UMError::from("Permission checker not initialized")))
}
