//! Request and response bodies of the account and recovery endpoints

use idn_core::services::verification::is_well_formed_code;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One-time codes are exactly six ASCII digits
fn validate_code(code: &str) -> Result<(), ValidationError> {
    if is_well_formed_code(code) {
        Ok(())
    } else {
        Err(ValidationError::new("code_format"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, max = 254))]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyResetRequest {
    #[validate(length(min = 1, max = 254))]
    pub username: String,

    /// Six-digit code from the mail or SMS
    #[validate(custom(function = "validate_code"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub user_id: i64,

    /// Grant returned by the verify step
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PhoneVerificationStartRequest {
    #[validate(length(min = 1, max = 254))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneVerificationStartResponse {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhoneVerificationConfirmRequest {
    pub user_id: i64,

    #[validate(custom(function = "validate_code"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailVerificationConfirmRequest {
    #[validate(custom(function = "validate_code"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEmailRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub old_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 32))]
    pub role: String,
}

/// Whether a one-time code went out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResultResponse {
    pub sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_bodies() {
        let body: ResetPasswordRequest = serde_json::from_str(
            r#"{"userId": 7, "token": "0b8c", "password": "n3w-passw0rd"}"#,
        )
        .unwrap();
        assert_eq!(body.user_id, 7);
        assert!(body.validate().is_ok());

        let json = serde_json::to_value(PhoneVerificationStartResponse { user_id: 3 }).unwrap();
        assert_eq!(json["userId"], 3);
    }

    #[test]
    fn test_code_must_be_six_digits() {
        let short = VerifyResetRequest {
            username: "anna@example.com".to_string(),
            token: "123".to_string(),
        };
        assert!(short.validate().is_err());

        let letters = VerifyResetRequest {
            token: "abcdef".to_string(),
            ..short.clone()
        };
        let errors = letters.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("token"));

        let ok = VerifyResetRequest {
            token: "123456".to_string(),
            ..short
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_confirm_bodies_reject_non_digit_codes() {
        let phone: PhoneVerificationConfirmRequest =
            serde_json::from_str(r#"{"userId": 3, "token": "12a456"}"#).unwrap();
        assert!(phone.validate().unwrap_err().field_errors().contains_key("token"));

        let email = EmailVerificationConfirmRequest {
            token: "１２３４５６".to_string(),
        };
        assert!(email.validate().is_err());

        let email = EmailVerificationConfirmRequest {
            token: "012345".to_string(),
        };
        assert!(email.validate().is_ok());
    }

    #[test]
    fn test_new_password_length() {
        let request = ChangePasswordRequest {
            old_password: "old-password".to_string(),
            new_password: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_email_format() {
        let request = UpdateEmailRequest {
            password: "secret".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
