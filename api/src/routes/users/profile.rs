use actix_web::HttpResponse;

use crate::middleware::Authenticated;

/// Handler for GET /api/users/me
pub async fn me(Authenticated(principal): Authenticated) -> HttpResponse {
    HttpResponse::Ok().json(principal)
}
