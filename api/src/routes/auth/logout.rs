use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use idn_core::domain::entities::AUTHORIZATION_HEADER;
use idn_core::DomainError;

use crate::dto::MessageResponse;
use crate::handlers::error::error_body;
use crate::handlers::handle_domain_error_with_lang;
use crate::i18n::{message, request_language};
use crate::routes::header_value;
use crate::state::AppState;

/// Handler for POST {scope}/logout
///
/// Ends the session of the presented access token.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// ## Errors
/// - 400 Bad Request: no token, or not the currently pinned one
/// - 500 Internal Server Error: session store unavailable
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let lang = request_language(&req);
    let authorization = header_value(&req, AUTHORIZATION_HEADER);

    match state
        .auth_for_path(req.path())
        .logout(authorization.as_deref(), req.path())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: message("general", "logged-out", lang),
        }),
        Err(error @ DomainError::Internal { .. }) => handle_domain_error_with_lang(&error, lang),
        Err(error) => {
            log::debug!("Logout refused: {}", error);
            error_body(StatusCode::BAD_REQUEST, "auth", "authentication", lang, &[])
        }
    }
}
