//! Limits applied to one-time codes and short-lived grants

use serde::{Deserialize, Serialize};

use super::env_or;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Lifetime of an expirable verification token in minutes
    pub token_expiration_minutes: i64,

    /// Number of checks allowed against one verification token
    pub token_check_max_attempts: i32,

    /// Minimum interval between two code issuances for the same account and purpose
    pub resend_token_after_seconds: i64,

    /// Lifetime of a password reset grant in minutes
    #[serde(default = "default_grant_minutes")]
    pub password_reset_grant_minutes: u64,

    /// Lifetime of the phone verification cooldown marker in minutes
    #[serde(default = "default_grant_minutes")]
    pub phone_verification_info_minutes: u64,

    /// Upper bound for multi-step account flows such as an email change
    #[serde(default = "default_multi_step_timeout_seconds")]
    pub multi_step_timeout_seconds: u64,
}

fn default_grant_minutes() -> u64 {
    10
}

fn default_multi_step_timeout_seconds() -> u64 {
    15
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            token_expiration_minutes: 15,
            token_check_max_attempts: 5,
            resend_token_after_seconds: 60,
            password_reset_grant_minutes: default_grant_minutes(),
            phone_verification_info_minutes: default_grant_minutes(),
            multi_step_timeout_seconds: default_multi_step_timeout_seconds(),
        }
    }
}

impl LimitsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_expiration_minutes: env_or(
                "LIMITS_TOKEN_EXPIRATION_MINUTES",
                defaults.token_expiration_minutes,
            ),
            token_check_max_attempts: env_or(
                "LIMITS_TOKEN_CHECK_MAX_ATTEMPTS",
                defaults.token_check_max_attempts,
            ),
            resend_token_after_seconds: env_or(
                "LIMITS_RESEND_TOKEN_AFTER_SECONDS",
                defaults.resend_token_after_seconds,
            ),
            password_reset_grant_minutes: env_or(
                "LIMITS_PASSWORD_RESET_GRANT_MINUTES",
                defaults.password_reset_grant_minutes,
            ),
            phone_verification_info_minutes: env_or(
                "LIMITS_PHONE_VERIFICATION_INFO_MINUTES",
                defaults.phone_verification_info_minutes,
            ),
            multi_step_timeout_seconds: env_or(
                "LIMITS_MULTI_STEP_TIMEOUT_SECONDS",
                defaults.multi_step_timeout_seconds,
            ),
        }
    }
}
