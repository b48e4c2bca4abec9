//! Application factory
//!
//! Both account types get their own scope wrapped in [`JwtAuth`]. The shared
//! session and recovery routes are mounted under each scope; the remaining
//! routes exist under one scope only.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpRequest, HttpResponse,
};

use idn_core::AccountType;

use crate::handlers::error::error_body;
use crate::handlers::json_error_handler;
use crate::i18n::request_language;
use crate::middleware::JwtAuth;
use crate::routes::{auth, health, recovery, users};
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Logger::default())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope(AccountType::Primary.path_prefix())
                .wrap(JwtAuth::new())
                .configure(configure_shared)
                .configure(configure_primary),
        )
        .service(
            web::scope(AccountType::Operator.path_prefix())
                .wrap(JwtAuth::new())
                .configure(configure_shared)
                .configure(configure_operator),
        )
        .default_service(web::route().to(not_found))
}

/// Session and recovery routes present under both scopes
pub fn configure_shared(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(auth::login))
        .route("/token/refresh", web::post().to(auth::refresh))
        .route("/logout", web::post().to(auth::logout))
        .route("/users/forgot-password", web::post().to(recovery::forgot_password))
        .route("/users/forgot-password/verify", web::post().to(recovery::verify_reset))
        .route("/users/reset-password", web::post().to(recovery::reset_password));
}

/// Routes of primary accounts only
pub fn configure_primary(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/phone-number/start-verification",
        web::post().to(users::phone::start_verification),
    )
    .route(
        "/users/phone-number/confirm-verification",
        web::post().to(users::phone::confirm_verification),
    )
    .route(
        "/users/email/start-verification",
        web::post().to(users::email::start_verification),
    )
    .route(
        "/users/email/confirm-verification",
        web::post().to(users::email::confirm_verification),
    )
    .route("/users/email", web::put().to(users::email::update_email))
    .route("/users/password", web::put().to(users::password::change_password))
    .route("/users/me", web::get().to(users::profile::me));
}

/// Routes of operator accounts only
pub fn configure_operator(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{id}/role", web::put().to(users::role::update_role));
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    error_body(
        actix_web::http::StatusCode::NOT_FOUND,
        "general",
        "not-found",
        request_language(&req),
        &[],
    )
}
