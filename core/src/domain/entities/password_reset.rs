//! Password reset grant issued after a successful one-time code check.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single-use proof that the holder passed password recovery verification
///
/// Stored in the cache under the account type's reset prefix and consumed by
/// the password-set step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetGrant {
    pub account_id: i64,
    pub token: String,
}

impl PasswordResetGrant {
    pub fn new(account_id: i64) -> Self {
        Self {
            account_id,
            token: Uuid::new_v4().to_string(),
        }
    }
}
