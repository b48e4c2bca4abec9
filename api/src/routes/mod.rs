//! Route handlers
//!
//! Handlers are shared by both scopes. The request path tells them which
//! account type they serve, and it is also the issuer written into minted
//! tokens.

pub mod auth;
pub mod health;
pub mod recovery;
pub mod users;

use actix_web::{HttpRequest, HttpResponse};

use idn_core::domain::entities::{AUTHORIZATION_HEADER, REFRESH_TOKEN_HEADER};
use idn_core::{AccountType, TokenPair};

/// 200 carrying a freshly minted pair in the response headers
pub(crate) fn tokens_response(pair: &TokenPair) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((AUTHORIZATION_HEADER, pair.authorization_header_value()))
        .insert_header((REFRESH_TOKEN_HEADER, pair.refresh_header_value()))
        .finish()
}

pub(crate) fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

pub(crate) fn account_type(req: &HttpRequest) -> AccountType {
    AccountType::from_path(req.path())
}
