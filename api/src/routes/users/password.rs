use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::ChangePasswordRequest;
use crate::handlers::{handle_domain_error_with_lang, handle_validation_errors};
use crate::i18n::request_language;
use crate::middleware::Authenticated;
use crate::routes::account_type;
use crate::state::AppState;

/// Handler for PUT /api/users/password
///
/// Field errors name `oldPassword` when the current password is wrong and
/// `newPassword` when it would not change.
pub async fn change_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(principal): Authenticated,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .change_password(&principal.subject, &request.old_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
