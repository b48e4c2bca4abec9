use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::LoginRequest;
use crate::handlers::{handle_domain_error_with_lang, handle_validation_errors};
use crate::i18n::request_language;
use crate::routes::tokens_response;
use crate::state::AppState;

/// Handler for POST {scope}/login
///
/// # Request Body
///
/// ```json
/// {
///     "username": "anna@example.com",
///     "password": "..."
/// }
/// ```
///
/// The username may also be a phone number in any accepted local form.
///
/// # Response
///
/// ## Success (200 OK)
/// Empty body; tokens in the `Authorization` and `RefreshToken` headers.
///
/// ## Errors
/// - 403 Forbidden: `{timestamp, cause, appErrorCode}`
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .auth_for_path(req.path())
        .login(&request.username, &request.password, req.path())
        .await
    {
        Ok(pair) => tokens_response(&pair),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
