use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{
    PhoneVerificationConfirmRequest, PhoneVerificationStartRequest, PhoneVerificationStartResponse,
};
use crate::handlers::{handle_domain_error_with_lang, handle_validation_errors};
use crate::i18n::request_language;
use crate::routes::{account_type, tokens_response};
use crate::state::AppState;

/// Handler for POST /api/users/phone-number/start-verification
///
/// Re-checks the credentials of an account that cannot sign in yet because
/// its phone is unverified, then texts it a code.
///
/// ## Success (200 OK)
/// ```json
/// { "userId": 42 }
/// ```
///
/// ## Errors
/// - 403 Forbidden: wrong credentials, inactive account or phone already verified
/// - 409 Conflict: a code was sent inside the resend cooldown
/// - 503 Service Unavailable: the SMS provider refused the request
pub async fn start_verification(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<PhoneVerificationStartRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .start_phone_verification(&request.username, &request.password)
        .await
    {
        Ok(user_id) => HttpResponse::Ok().json(PhoneVerificationStartResponse { user_id }),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for POST /api/users/phone-number/confirm-verification
///
/// A confirmed code signs the account in: the response carries a new pair
/// in the same headers as login.
pub async fn confirm_verification(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<PhoneVerificationConfirmRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .confirm_phone_verification(request.user_id, &request.token, req.path())
        .await
    {
        Ok(pair) => tokens_response(&pair),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
