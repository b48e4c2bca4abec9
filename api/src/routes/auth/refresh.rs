use actix_web::{web, HttpRequest, HttpResponse};

use idn_core::domain::entities::REFRESH_TOKEN_HEADER;

use crate::handlers::handle_domain_error_with_lang;
use crate::i18n::request_language;
use crate::routes::{header_value, tokens_response};
use crate::state::AppState;

/// Handler for POST {scope}/token/refresh
///
/// No body. Reads `RefreshToken: Bearer <refresh>` and answers with a new
/// pair in the same headers as login.
///
/// ## Errors
/// - 400 Bad Request: header missing or without the `Bearer ` prefix
/// - 403 Forbidden: token untrusted, superseded or owner no longer active
pub async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let lang = request_language(&req);
    let refresh_token = header_value(&req, REFRESH_TOKEN_HEADER);

    match state
        .auth_for_path(req.path())
        .refresh(refresh_token.as_deref(), req.path())
        .await
    {
        Ok(pair) => tokens_response(&pair),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
