//! Password recovery endpoints, mounted under both scopes
//!
//! 1. `POST {scope}/users/forgot-password` sends a code by mail or SMS
//! 2. `POST {scope}/users/forgot-password/verify` exchanges it for a grant
//! 3. `POST {scope}/users/reset-password` spends the grant on a new password

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{ForgotPasswordRequest, ResetPasswordRequest, SendResultResponse, VerifyResetRequest};
use crate::handlers::{handle_domain_error_with_lang, handle_validation_errors};
use crate::i18n::request_language;
use crate::routes::account_type;
use crate::state::AppState;

/// Handler for POST {scope}/users/forgot-password
///
/// Answers `{"sent": false}` for unknown accounts rather than an error.
pub async fn forgot_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .send_reset_message(&request.username)
        .await
    {
        Ok(sent) => HttpResponse::Ok().json(SendResultResponse { sent }),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for POST {scope}/users/forgot-password/verify
///
/// ## Success (200 OK)
/// ```json
/// {
///     "accountId": 42,
///     "token": "6f1c0d5e-..."
/// }
/// ```
pub async fn verify_reset(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyResetRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .verify_reset_token(&request.username, &request.token)
        .await
    {
        Ok(grant) => HttpResponse::Ok().json(grant),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for POST {scope}/users/reset-password
pub async fn reset_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .reset_password(request.user_id, &request.token, &request.password)
        .await
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
