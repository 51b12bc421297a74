//! HTTP middleware for notes-service.
//!
//! Provides the JWT authentication gate for the `/api` scope. The gate
//! extracts a Bearer token, validates it against the configured secret and
//! stores the authenticated [`UserId`] in request extensions so handlers can
//! pull it out with the [`FromRequest`] extractor.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::security::jwt;

/// Extracted user identifier stored in request extensions after auth.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

/// Actix middleware that validates a Bearer token before the handler runs.
///
/// A request with no usable Authorization header is rejected with 401
/// "Missing token"; a request whose token fails validation is rejected with
/// 403 "Invalid token".
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let config = req
                .app_data::<web::Data<Config>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("app config not registered".into()))?;

            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or(AppError::MissingToken)?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(AppError::MissingToken)?;

            let claims = jwt::validate_access_token(token, &config.auth.jwt_secret)
                .map_err(|_| AppError::InvalidToken)?;

            let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .cloned()
                .ok_or_else(|| AppError::MissingToken.into()),
        )
    }
}
