//! JWT authentication middleware.
//!
//! The middleware never rejects a request on its own account. It resolves the
//! `Authorization` header through the authentication service owning the
//! request path and records the outcome in the request extensions:
//!
//! * a verified, still-pinned token attaches a [`Principal`];
//! * a verified but superseded token attaches a [`StaleSession`] marker;
//! * anything else leaves the request anonymous.
//!
//! Handlers that need an identity take [`Authenticated`], which turns an
//! anonymous request into a 403 carrying the stale-session cause when one was
//! recorded. Only a pin-store outage fails the request here, with a 500.

use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use idn_core::domain::entities::AUTHORIZATION_HEADER;
use idn_core::errors::{AuthError, DomainError, TokenError};
use idn_core::Principal;

use crate::handlers::domain_error;
use crate::i18n::request_language;
use crate::state::AppState;

/// Marker left by the middleware when a verified token is no longer pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleSession;

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::warn!("Application state missing, request stays anonymous");
                return service.call(req).await;
            };

            let authorization = extract_authorization(&req);
            let auth = state.auth_for_path(req.path());

            match auth.authenticate(authorization.as_deref()).await {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                }
                Ok(None) => {}
                Err(DomainError::Token(TokenError::Stale)) => {
                    req.extensions_mut().insert(StaleSession);
                }
                Err(e) => {
                    let lang = request_language(req.request());
                    return Err(domain_error(e, lang));
                }
            }

            service.call(req).await
        })
    }
}

/// Raw `Authorization` header value; prefix checks happen in the service
fn extract_authorization(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION_HEADER)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

/// Identity of an authenticated caller
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        let result = match extensions.get::<Principal>() {
            Some(principal) => Ok(Authenticated(principal.clone())),
            None => {
                let cause: DomainError = if extensions.get::<StaleSession>().is_some() {
                    TokenError::Stale.into()
                } else {
                    AuthError::AccessDenied.into()
                };
                Err(domain_error(cause, request_language(req)))
            }
        };

        ready(result)
    }
}
