use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{EmailVerificationConfirmRequest, SendResultResponse, UpdateEmailRequest};
use crate::handlers::{handle_domain_error_with_lang, handle_validation_errors};
use crate::i18n::request_language;
use crate::middleware::Authenticated;
use crate::routes::{account_type, tokens_response};
use crate::state::AppState;

/// Handler for POST /api/users/email/start-verification
///
/// Mails a confirmation code to the caller's current email.
pub async fn start_verification(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(principal): Authenticated,
) -> HttpResponse {
    let lang = request_language(&req);

    match state
        .accounts(account_type(&req))
        .start_email_verification(&principal.subject)
        .await
    {
        Ok(sent) => HttpResponse::Ok().json(SendResultResponse { sent }),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for POST /api/users/email/confirm-verification
pub async fn confirm_verification(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(principal): Authenticated,
    request: web::Json<EmailVerificationConfirmRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .confirm_email_verification(&principal.subject, &request.token)
        .await
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for PUT /api/users/email
///
/// The session moves to the new email: the old pair stops working and the
/// response carries a new one in the login headers.
///
/// ## Errors
/// - 400 Bad Request: malformed email, or the current one
/// - 403 Forbidden: wrong password
/// - 409 Conflict: email taken by another account
/// - 503 Service Unavailable: the change did not finish in time
pub async fn update_email(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(principal): Authenticated,
    request: web::Json<UpdateEmailRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .update_email(&principal.subject, &request.password, &request.email, req.path())
        .await
    {
        Ok(pair) => tokens_response(&pair),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
