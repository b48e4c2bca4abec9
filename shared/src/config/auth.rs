//! Token signing configuration
//!
//! Access and refresh tokens are signed with two distinct secrets. Both are
//! configured base64 encoded, matching the format used by the deployed key
//! material.

use serde::{Deserialize, Serialize};

use super::env_or;

/// Signing material and lifetimes for access and refresh tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Base64 encoded HMAC secret for access tokens
    pub access_secret: String,

    /// Base64 encoded HMAC secret for refresh tokens
    pub refresh_secret: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,

    /// Refresh token lifetime in days
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,
}

fn default_access_token_expiry_minutes() -> i64 {
    30
}

fn default_refresh_token_expiry_days() -> i64 {
    30
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // "development-access-secret-change-me"
            access_secret: String::from("ZGV2ZWxvcG1lbnQtYWNjZXNzLXNlY3JldC1jaGFuZ2UtbWU="),
            // "development-refresh-secret-change-me"
            refresh_secret: String::from("ZGV2ZWxvcG1lbnQtcmVmcmVzaC1zZWNyZXQtY2hhbmdlLW1l"),
            access_token_expiry_minutes: default_access_token_expiry_minutes(),
            refresh_token_expiry_days: default_refresh_token_expiry_days(),
        }
    }
}

impl JwtConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            access_secret: std::env::var("JWT_ACCESS_SECRET").unwrap_or(defaults.access_secret),
            refresh_secret: std::env::var("JWT_REFRESH_SECRET").unwrap_or(defaults.refresh_secret),
            access_token_expiry_minutes: env_or(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                defaults.access_token_expiry_minutes,
            ),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                defaults.refresh_token_expiry_days,
            ),
        }
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 24 * 60 * 60
    }
}
