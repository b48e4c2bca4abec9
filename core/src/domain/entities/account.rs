//! Account entity shared by both account populations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cache_namespace::CacheNamespace;
use super::token::ROLE_PREFIX;

/// Path prefix served to end-user accounts
pub const PRIMARY_PATH_PREFIX: &str = "/api";

/// Path prefix served to operator accounts
pub const OPERATOR_PATH_PREFIX: &str = "/system";

/// Which of the two account populations a request or session belongs to
///
/// Signing keys are shared; pin-store keys, verification tables and password
/// reset grants are isolated per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// End-user accounts served under `/api`
    Primary,
    /// Internal operator accounts served under `/system`
    Operator,
}

impl AccountType {
    pub const ALL: [AccountType; 2] = [AccountType::Primary, AccountType::Operator];

    /// Decide the account type from a request path
    ///
    /// Anything outside the end-user prefix belongs to operators, so an
    /// unknown path can never be authenticated against end-user pins.
    pub fn from_path(path: &str) -> Self {
        if path.starts_with(PRIMARY_PATH_PREFIX) {
            AccountType::Primary
        } else {
            AccountType::Operator
        }
    }

    pub fn path_prefix(&self) -> &'static str {
        match self {
            AccountType::Primary => PRIMARY_PATH_PREFIX,
            AccountType::Operator => OPERATOR_PATH_PREFIX,
        }
    }

    /// End users must confirm their phone number before they can sign in
    pub fn requires_phone_verification(&self) -> bool {
        matches!(self, AccountType::Primary)
    }

    pub fn access_token_namespace(&self) -> CacheNamespace {
        match self {
            AccountType::Primary => CacheNamespace::AppUserAccessToken,
            AccountType::Operator => CacheNamespace::SystemUserAccessToken,
        }
    }

    pub fn refresh_token_namespace(&self) -> CacheNamespace {
        match self {
            AccountType::Primary => CacheNamespace::AppUserRefreshToken,
            AccountType::Operator => CacheNamespace::SystemUserRefreshToken,
        }
    }

    pub fn password_reset_namespace(&self) -> CacheNamespace {
        match self {
            AccountType::Primary => CacheNamespace::AppUserPasswordReset,
            AccountType::Operator => CacheNamespace::SystemUserPasswordReset,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Primary => write!(f, "primary"),
            AccountType::Operator => write!(f, "operator"),
        }
    }
}

/// A credential-bearing account of either population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,

    /// Stored lowercased; used as the token subject
    pub email: String,

    /// Normalized phone number (`+374XXXXXXXX`)
    pub phone_number: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role name without the authority prefix, e.g. `USER` or `ADMIN`
    pub role: String,

    pub active: bool,
    pub phone_verified: bool,
    pub email_verified: bool,

    pub password_updated_at: Option<DateTime<Utc>>,
    pub email_updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Authorities granted to this account, in `ROLE_<role>` form
    pub fn authorities(&self) -> Vec<String> {
        vec![format!("{}{}", ROLE_PREFIX, self.role)]
    }

    /// Token subject for this account
    pub fn subject(&self) -> String {
        self.email.to_lowercase()
    }

    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
        self.password_updated_at = Some(Utc::now());
    }

    /// Switch to a new email; the new address starts unverified
    pub fn change_email(&mut self, email: &str) {
        self.email = email.to_lowercase();
        self.email_verified = false;
        self.email_updated_at = Some(Utc::now());
    }
}
