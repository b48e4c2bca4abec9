//! Configuration for the verification services

use chrono::Duration;
use idn_shared::LimitsConfig;

/// Limits governing code lifetime, retries and resend throttling
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a stored code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of checks against a single code
    pub max_attempts: i32,
    /// Minimum seconds between two codes for the same target
    pub resend_cooldown_seconds: i64,
    /// How long a phone verification stays marked as pending
    pub phone_verification_info_minutes: u64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}

impl VerificationServiceConfig {
    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self {
            code_expiration_minutes: limits.token_expiration_minutes,
            max_attempts: limits.token_check_max_attempts,
            resend_cooldown_seconds: limits.resend_token_after_seconds,
            phone_verification_info_minutes: limits.phone_verification_info_minutes,
        }
    }

    pub fn code_lifetime(&self) -> Duration {
        Duration::minutes(self.code_expiration_minutes)
    }

    pub fn resend_cooldown(&self) -> Duration {
        Duration::seconds(self.resend_cooldown_seconds)
    }
}
