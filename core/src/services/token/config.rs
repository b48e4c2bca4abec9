//! Configuration for the token issuer

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Duration;
use idn_shared::JwtConfig;

use crate::errors::{DomainError, DomainResult};

/// Decoded signing material and lifetimes
#[derive(Clone)]
pub struct TokenIssuerConfig {
    /// HMAC key for access tokens
    pub access_secret: Vec<u8>,
    /// HMAC key for refresh tokens
    pub refresh_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl TokenIssuerConfig {
    /// Decode the base64 secrets of a [`JwtConfig`]
    pub fn from_jwt_config(config: &JwtConfig) -> DomainResult<Self> {
        let access_secret = decode_secret("access", &config.access_secret)?;
        let refresh_secret = decode_secret("refresh", &config.refresh_secret)?;

        if access_secret == refresh_secret {
            tracing::warn!(
                event = "jwt_secrets_shared",
                "Access and refresh tokens are configured with the same secret"
            );
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_token_ttl: Duration::minutes(config.access_token_expiry_minutes),
            refresh_token_ttl: Duration::days(config.refresh_token_expiry_days),
        })
    }
}

impl std::fmt::Debug for TokenIssuerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuerConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

fn decode_secret(kind: &str, encoded: &str) -> DomainResult<Vec<u8>> {
    let secret = STANDARD
        .decode(encoded.trim())
        .map_err(|e| DomainError::internal(format!("{} secret is not valid base64: {}", kind, e)))?;
    if secret.is_empty() {
        return Err(DomainError::internal(format!("{} secret is empty", kind)));
    }
    Ok(secret)
}
