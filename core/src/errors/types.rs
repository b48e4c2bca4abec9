//! Error types for authentication, token handling and one-time code verification
//!
//! Messages here are for logs. User-facing text is resolved in the presentation
//! layer from the variant so it can be localized.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Application error codes returned to clients on a rejected login
///
/// Serialized as the bare integer so clients can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationErrorCode {
    InvalidCredentials = 1,
    AccountNotActive = 2,
    PhoneNumberNotVerified = 3,
    AuthenticationError = 4,
}

impl ApplicationErrorCode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Serialize for ApplicationErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Credential errors raised by login and credential re-checks
///
/// None of these reveal whether the username or the password was wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is not active")]
    AccountNotActive,

    #[error("Phone number is not verified")]
    PhoneNumberNotVerified,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Access denied")]
    AccessDenied,
}

impl AuthError {
    pub fn application_code(&self) -> ApplicationErrorCode {
        match self {
            AuthError::InvalidCredentials => ApplicationErrorCode::InvalidCredentials,
            AuthError::AccountNotActive => ApplicationErrorCode::AccountNotActive,
            AuthError::PhoneNumberNotVerified => ApplicationErrorCode::PhoneNumberNotVerified,
            AuthError::AuthenticationError | AuthError::AccessDenied => {
                ApplicationErrorCode::AuthenticationError
            }
        }
    }
}

/// Token errors
///
/// `SignatureInvalid` and `Expired` come from the issuer and are treated as
/// "no credential" by request authentication. `Stale` means the token verified
/// but is no longer the pinned one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature or structure is invalid")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    #[error("Token is no longer the active session token")]
    Stale,

    #[error("{header} header is missing or malformed")]
    MissingHeader { header: String },

    #[error("Refresh token cannot be trusted")]
    RefreshUntrusted,

    #[error("Invalid refresh token")]
    InvalidRefresh,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// One-time code verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Verification token expired")]
    TokenExpired,

    #[error("Maximum verification attempts exceeded")]
    MaxAttemptsExceeded,

    #[error("Resend cooldown active, retry in {retry_after_seconds} seconds")]
    ResendNotAllowed { retry_after_seconds: i64 },

    #[error("Action not allowed: {reason}")]
    ActionNotAllowed { reason: String },

    #[error("Invalid verification code for field {field}")]
    InvalidToken { field: String },

    #[error("{channel} is already verified")]
    AlreadyVerified { channel: String },

    #[error("Verification message could not be delivered")]
    DeliveryFailed,
}

impl VerificationError {
    pub fn not_allowed(reason: impl Into<String>) -> Self {
        VerificationError::ActionNotAllowed {
            reason: reason.into(),
        }
    }

    pub fn invalid_token(field: impl Into<String>) -> Self {
        VerificationError::InvalidToken {
            field: field.into(),
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Current password is incorrect")]
    InvalidOldPassword,

    #[error("New password must differ from the current one")]
    PasswordReused,

    #[error("New email must differ from the current one")]
    SameEmail,
}
