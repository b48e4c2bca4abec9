use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use idn_core::errors::AuthError;

use crate::dto::UpdateRoleRequest;
use crate::handlers::{handle_domain_error_with_lang, handle_validation_errors};
use crate::i18n::request_language;
use crate::middleware::Authenticated;
use crate::routes::account_type;
use crate::state::AppState;

/// Role allowed to manage roles
pub const ADMIN_ROLE: &str = "ADMIN";

/// Handler for PUT /system/users/{id}/role
///
/// Admin only. The target's current session ends; it signs in again to pick
/// up the new authorities.
pub async fn update_role(
    req: HttpRequest,
    state: web::Data<AppState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
    request: web::Json<UpdateRoleRequest>,
) -> HttpResponse {
    let lang = request_language(&req);
    if !principal.has_role(ADMIN_ROLE) {
        log::warn!("Role change refused for {}", principal.subject);
        return handle_domain_error_with_lang(&AuthError::AccessDenied.into(), lang);
    }
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .accounts(account_type(&req))
        .update_role(path.into_inner(), &request.role)
        .await
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
