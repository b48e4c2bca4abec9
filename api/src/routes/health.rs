use actix_web::{web, HttpResponse};

use idn_shared::HealthResponse;

use crate::state::AppState;

/// Health check endpoint handler
///
/// 503 when MySQL or Redis does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (database_up, cache_up) =
        futures_util::join!(state.health.database_up(), state.health.cache_up());
    let body = HealthResponse::new("idonow-api", env!("CARGO_PKG_VERSION"), database_up, cache_up);

    if body.is_healthy() {
        HttpResponse::Ok().json(body)
    } else {
        log::warn!("Health check failed: database={}, cache={}", body.database, body.cache);
        HttpResponse::ServiceUnavailable().json(body)
    }
}
