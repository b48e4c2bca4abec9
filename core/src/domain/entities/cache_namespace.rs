//! Statically declared cache namespaces.

use serde::Serialize;

/// Every key family this service writes to the shared cache
///
/// Pin namespaces are Redis hashes keyed by subject. The remaining entries are
/// key prefixes followed by an account id or phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CacheNamespace {
    AppUserAccessToken,
    AppUserRefreshToken,
    SystemUserAccessToken,
    SystemUserRefreshToken,
    PhoneVerificationInfo,
    AppUserPasswordReset,
    SystemUserPasswordReset,
}

impl CacheNamespace {
    pub const ALL: [CacheNamespace; 7] = [
        CacheNamespace::AppUserAccessToken,
        CacheNamespace::AppUserRefreshToken,
        CacheNamespace::SystemUserAccessToken,
        CacheNamespace::SystemUserRefreshToken,
        CacheNamespace::PhoneVerificationInfo,
        CacheNamespace::AppUserPasswordReset,
        CacheNamespace::SystemUserPasswordReset,
    ];

    /// Session pin hashes, cleared on startup
    pub const PINS: [CacheNamespace; 4] = [
        CacheNamespace::AppUserAccessToken,
        CacheNamespace::AppUserRefreshToken,
        CacheNamespace::SystemUserAccessToken,
        CacheNamespace::SystemUserRefreshToken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::AppUserAccessToken => "appUserAccessToken",
            CacheNamespace::AppUserRefreshToken => "appUserRefreshToken",
            CacheNamespace::SystemUserAccessToken => "systemUserAccessToken",
            CacheNamespace::SystemUserRefreshToken => "systemUserRefreshToken",
            CacheNamespace::PhoneVerificationInfo => "verificationInfo:",
            CacheNamespace::AppUserPasswordReset => "appUserPasswordReset:",
            CacheNamespace::SystemUserPasswordReset => "systemUserPasswordReset:",
        }
    }

    /// Whether this namespace is a key prefix rather than a hash name
    pub fn is_prefix(&self) -> bool {
        self.as_str().ends_with(':')
    }

    /// Build a key under a prefix namespace
    pub fn key(&self, suffix: impl std::fmt::Display) -> String {
        format!("{}{}", self.as_str(), suffix)
    }
}

impl std::fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
