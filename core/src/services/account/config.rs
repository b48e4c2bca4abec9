//! Configuration for account flows

use std::time::Duration;

use idn_shared::LimitsConfig;

#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Lifetime of a password reset grant in minutes
    pub password_reset_grant_minutes: u64,
    /// Upper bound for multi-step flows such as an email change
    pub multi_step_timeout_seconds: u64,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}

impl AccountServiceConfig {
    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self {
            password_reset_grant_minutes: limits.password_reset_grant_minutes,
            multi_step_timeout_seconds: limits.multi_step_timeout_seconds,
        }
    }

    pub fn grant_ttl_seconds(&self) -> u64 {
        self.password_reset_grant_minutes * 60
    }

    pub fn multi_step_timeout(&self) -> Duration {
        Duration::from_secs(self.multi_step_timeout_seconds)
    }
}
