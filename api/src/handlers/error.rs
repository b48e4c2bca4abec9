//! Translation of domain errors into localized HTTP responses
//!
//! | Error | Status | Body |
//! |-------|--------|------|
//! | rejected login | 403 | `{timestamp, cause, appErrorCode}` |
//! | wrong one-time code | 400 | `{message, fields: {token: ...}}` |
//! | resend inside cooldown | 409 | field error plus `Retry-After` |
//! | verification refused, expired or exhausted | 403 | `{error, message}` |
//! | stale or untrusted token | 403 | `{error, message}` |
//! | store or provider failure | 500 / 503 | generic message only |

use std::collections::HashMap;

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use idn_core::errors::{AuthError, DomainError, TokenError, ValidationError, VerificationError};
use idn_shared::{AuthFailureResponse, ErrorResponse, FieldErrorResponse};

use crate::i18n::{format_message, get_error_message, request_language, Language};

fn lookup(category: &str, key: &str, lang: Language, params: &[(&str, String)]) -> (String, String) {
    let (code, text) = match get_error_message(category, key, lang) {
        Some((code, text, _)) => (code, text),
        None => (key.to_uppercase(), format!("{}.{}", category, key)),
    };
    let params: HashMap<&str, String> = params.iter().cloned().collect();
    (code, format_message(&text, &params))
}

pub(crate) fn error_body(
    status: StatusCode,
    category: &str,
    key: &str,
    lang: Language,
    params: &[(&str, String)],
) -> HttpResponse {
    let (code, text) = lookup(category, key, lang, params);
    HttpResponse::build(status).json(ErrorResponse::new(code, text))
}

fn field_body(field: &str, category: &str, key: &str, lang: Language, params: &[(&str, String)]) -> FieldErrorResponse {
    let (_, text) = lookup(category, key, lang, params);
    FieldErrorResponse::new(text.clone()).with_field(field, text)
}

fn login_failure(cause: &AuthError, lang: Language) -> HttpResponse {
    let key = match cause {
        AuthError::InvalidCredentials => "invalid-user-pwd",
        AuthError::AccountNotActive => "account-not-active",
        AuthError::PhoneNumberNotVerified => "phone-not-verified",
        AuthError::AuthenticationError | AuthError::AccessDenied => "authentication",
    };
    let (_, text) = lookup("auth", key, lang, &[]);
    HttpResponse::Forbidden().json(AuthFailureResponse::new(text, cause.application_code().code()))
}

/// Handle domain errors with language support
pub fn handle_domain_error_with_lang(error: &DomainError, lang: Language) -> HttpResponse {
    match error {
        DomainError::Internal { .. } | DomainError::Token(TokenError::GenerationFailed) => {
            log::error!("Request failed: {}", error)
        }
        DomainError::Timeout { .. } | DomainError::Verification(VerificationError::DeliveryFailed) => {
            log::warn!("Request failed: {}", error)
        }
        _ => log::debug!("Request rejected: {}", error),
    }

    match error {
        DomainError::Auth(AuthError::AccessDenied) => {
            error_body(StatusCode::FORBIDDEN, "auth", "access-denied", lang, &[])
        }
        DomainError::Auth(cause) => login_failure(cause, lang),

        DomainError::Token(token_error) => match token_error {
            TokenError::Stale => error_body(StatusCode::FORBIDDEN, "token", "session-stale", lang, &[]),
            TokenError::RefreshUntrusted | TokenError::InvalidRefresh => {
                error_body(StatusCode::FORBIDDEN, "token", "refresh-token", lang, &[])
            }
            TokenError::SignatureInvalid | TokenError::Expired => {
                error_body(StatusCode::FORBIDDEN, "auth", "authentication", lang, &[])
            }
            TokenError::MissingHeader { header } => error_body(
                StatusCode::BAD_REQUEST,
                "token",
                "missing-header",
                lang,
                &[("header", header.clone())],
            ),
            TokenError::GenerationFailed => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "general", "internal", lang, &[])
            }
        },

        DomainError::Verification(verification_error) => match verification_error {
            VerificationError::InvalidToken { field } => HttpResponse::BadRequest().json(field_body(
                field,
                "verification",
                "invalid-token",
                lang,
                &[],
            )),
            VerificationError::ResendNotAllowed { retry_after_seconds } => {
                let seconds = (*retry_after_seconds).max(1);
                HttpResponse::Conflict()
                    .insert_header((header::RETRY_AFTER, seconds.to_string()))
                    .json(field_body(
                        "token",
                        "verification",
                        "token-already-sent",
                        lang,
                        &[("seconds", seconds.to_string())],
                    ))
            }
            VerificationError::ActionNotAllowed { .. } => {
                error_body(StatusCode::FORBIDDEN, "verification", "data-verification", lang, &[])
            }
            VerificationError::TokenExpired => {
                error_body(StatusCode::FORBIDDEN, "verification", "token-expired", lang, &[])
            }
            VerificationError::MaxAttemptsExceeded => {
                error_body(StatusCode::FORBIDDEN, "verification", "max-attempts", lang, &[])
            }
            VerificationError::AlreadyVerified { .. } => {
                error_body(StatusCode::FORBIDDEN, "verification", "already-verified", lang, &[])
            }
            VerificationError::DeliveryFailed => error_body(
                StatusCode::SERVICE_UNAVAILABLE,
                "verification",
                "request-failed",
                lang,
                &[],
            ),
        },

        DomainError::Validation(validation_error) => {
            let (field, key) = match validation_error {
                ValidationError::RequiredField { field } => (field.as_str(), "required"),
                ValidationError::InvalidFormat { field } => (field.as_str(), "invalid-format"),
                ValidationError::InvalidPhone => ("phoneNumber", "invalid-phone"),
                ValidationError::InvalidOldPassword => ("oldPassword", "password.invalid-old-password"),
                ValidationError::PasswordReused => ("newPassword", "password.old-pwd-forbidden"),
                ValidationError::SameEmail => ("email", "same-email"),
            };
            HttpResponse::BadRequest().json(field_body(field, "validation", key, lang, &[]))
        }

        DomainError::Conflict { field } => HttpResponse::Conflict().json(field_body(
            field,
            "general",
            "entity.already-exists",
            lang,
            &[("field", field.clone())],
        )),
        DomainError::NotFound { .. } => error_body(StatusCode::NOT_FOUND, "general", "not-found", lang, &[]),
        DomainError::Timeout { .. } => {
            error_body(StatusCode::SERVICE_UNAVAILABLE, "general", "timeout", lang, &[])
        }
        DomainError::Internal { .. } => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "general", "internal", lang, &[])
        }
    }
}

/// Field errors for a request body that failed `validator` checks
pub fn handle_validation_errors(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let (_, summary) = lookup("validation", "request", lang, &[]);
    let mut body = FieldErrorResponse::new(summary);

    for (field, field_errors) in errors.field_errors() {
        let key = if field_errors.iter().any(|e| &*e.code == "required") {
            "required"
        } else {
            "invalid-format"
        };
        let (_, text) = lookup("validation", key, lang, &[]);
        body = body.with_field(to_camel_case(&field), text);
    }

    HttpResponse::BadRequest().json(body)
}

/// Wrap a domain error so it can fail an extractor or middleware
pub fn domain_error(error: DomainError, lang: Language) -> actix_web::Error {
    let response = handle_domain_error_with_lang(&error, lang);
    InternalError::from_response(error, response).into()
}

/// Localized 400 for bodies that are not valid JSON for the endpoint
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let lang = request_language(req);
    log::debug!("Rejected request body on {}: {}", req.path(), err);
    let response =
        HttpResponse::BadRequest().json(field_body("body", "validation", "malformed-body", lang, &[]));
    InternalError::from_response(err, response).into()
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_login_failure_body() {
        let response = handle_domain_error_with_lang(
            &DomainError::Auth(AuthError::PhoneNumberNotVerified),
            Language::English,
        );
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["appErrorCode"], 3);
        assert_eq!(body["cause"], "Phone number is not verified");
        assert!(body.get("timestamp").is_some());
    }

    #[actix_web::test]
    async fn test_wrong_code_is_field_error() {
        let response = handle_domain_error_with_lang(
            &VerificationError::invalid_token("token").into(),
            Language::English,
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["fields"]["token"], "Invalid verification code");
    }

    #[actix_web::test]
    async fn test_resend_cooldown_names_the_wait() {
        let response = handle_domain_error_with_lang(
            &VerificationError::ResendNotAllowed {
                retry_after_seconds: 42,
            }
            .into(),
            Language::English,
        );
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");

        let body = body_json(response).await;
        assert!(body["fields"]["token"].as_str().unwrap().contains("42"));
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (VerificationError::not_allowed("x").into(), StatusCode::FORBIDDEN),
            (VerificationError::TokenExpired.into(), StatusCode::FORBIDDEN),
            (VerificationError::MaxAttemptsExceeded.into(), StatusCode::FORBIDDEN),
            (VerificationError::DeliveryFailed.into(), StatusCode::SERVICE_UNAVAILABLE),
            (TokenError::Stale.into(), StatusCode::FORBIDDEN),
            (TokenError::InvalidRefresh.into(), StatusCode::FORBIDDEN),
            (
                TokenError::MissingHeader {
                    header: "RefreshToken".to_string(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::AccessDenied.into(), StatusCode::FORBIDDEN),
            (ValidationError::InvalidOldPassword.into(), StatusCode::BAD_REQUEST),
            (
                DomainError::Conflict {
                    field: "email".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::not_found("account 1"), StatusCode::NOT_FOUND),
            (
                DomainError::Timeout {
                    operation: "update_email".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (DomainError::internal("redis down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(
                handle_domain_error_with_lang(&error, Language::English).status(),
                status,
                "{:?}",
                error
            );
        }
    }

    #[actix_web::test]
    async fn test_internal_detail_never_leaks() {
        let response = handle_domain_error_with_lang(
            &DomainError::internal("ERR connection refused 10.0.0.7:6379"),
            Language::English,
        );
        let body = body_json(response).await.to_string();
        assert!(!body.contains("10.0.0.7"));
    }

    #[actix_web::test]
    async fn test_password_errors_name_their_field() {
        let body = body_json(handle_domain_error_with_lang(
            &ValidationError::PasswordReused.into(),
            Language::English,
        ))
        .await;
        assert!(body["fields"].get("newPassword").is_some());
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("old_password"), "oldPassword");
        assert_eq!(to_camel_case("user_id"), "userId");
        assert_eq!(to_camel_case("token"), "token");
    }
}
