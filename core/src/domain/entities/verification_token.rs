//! One-time code record keyed by (account, purpose).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountType;

/// What a one-time code proves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPurpose {
    EmailConfirm,
    PasswordReset,
}

impl TokenPurpose {
    /// Whether tokens of this purpose lapse after the configured lifetime
    pub fn is_expirable(&self) -> bool {
        match self {
            TokenPurpose::EmailConfirm => true,
            TokenPurpose::PasswordReset => true,
        }
    }

    /// Column value stored in `token_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::EmailConfirm => "EMAIL_CONFIRM",
            TokenPurpose::PasswordReset => "PASSWORD_RESET",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL_CONFIRM" => Ok(TokenPurpose::EmailConfirm),
            "PASSWORD_RESET" => Ok(TokenPurpose::PasswordReset),
            other => Err(format!("Unknown token purpose: {}", other)),
        }
    }
}

/// Persisted one-time code
///
/// Only the bcrypt hash of the code is stored. At most one row exists per
/// (account type, account id, purpose).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: i64,
    pub account_type: AccountType,
    pub account_id: i64,
    pub purpose: TokenPurpose,
    #[serde(skip_serializing)]
    pub code_hash: String,
    pub attempt_number: i32,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// A fresh, not yet persisted token; the repository assigns the id
    pub fn new(
        account_type: AccountType,
        account_id: i64,
        purpose: TokenPurpose,
        code_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            account_type,
            account_id,
            purpose,
            code_hash,
            attempt_number: 0,
            created_at,
        }
    }

    /// Whether the token has outlived `lifetime` at `now`
    ///
    /// The instant `created_at + lifetime` itself is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        self.purpose.is_expirable() && now >= self.created_at + lifetime
    }

    /// Whether a new token may replace this one at `now`
    pub fn resend_allowed_at(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        now > self.created_at + cooldown
    }

    /// Seconds left until the resend cooldown lapses, at least 1 while it is active
    pub fn resend_wait_seconds(&self, now: DateTime<Utc>, cooldown: Duration) -> i64 {
        let remaining = (self.created_at + cooldown - now).num_seconds();
        remaining.max(1)
    }
}
