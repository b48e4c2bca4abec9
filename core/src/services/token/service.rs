//! Stateless JWT minting and verification

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, GrantedAuthority, RefreshClaims, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::services::clock::{Clock, SystemClock};

use super::config::TokenIssuerConfig;

/// Mints and verifies access and refresh tokens
///
/// Each token class has its own HS256 key and lifetime. Verification only
/// answers "is this well formed, correctly signed and unexpired"; it has no
/// side effects and never touches the cache.
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    config: TokenIssuerConfig,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Creates a token issuer driven by the system clock
    pub fn new(config: TokenIssuerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a token issuer with an explicit clock
    pub fn with_clock(config: TokenIssuerConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            access_encoding: EncodingKey::from_secret(&config.access_secret),
            access_decoding: DecodingKey::from_secret(&config.access_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_secret),
            validation,
            config,
            clock,
        }
    }

    /// Mint an access/refresh pair for `subject`
    ///
    /// # Arguments
    ///
    /// * `subject` - Account email; lowercased before signing
    /// * `authorities` - Authority names such as `ROLE_USER`
    /// * `issuer_path` - Request path the pair is issued from
    pub fn mint(
        &self,
        subject: &str,
        authorities: &[String],
        issuer_path: &str,
    ) -> Result<TokenPair, DomainError> {
        let subject = subject.to_lowercase();
        let now = self.clock.now();
        let iat = now.timestamp();

        let access = AccessClaims {
            sub: subject.clone(),
            authorities: authorities.iter().map(GrantedAuthority::new).collect(),
            iss: issuer_path.to_string(),
            iat,
            exp: (now + self.config.access_token_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let refresh = RefreshClaims {
            sub: subject,
            iss: issuer_path.to_string(),
            iat,
            exp: (now + self.config.refresh_token_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(TokenPair {
            access_token: self.sign(&access, &self.access_encoding)?,
            refresh_token: self.sign(&refresh, &self.refresh_encoding)?,
        })
    }

    /// Verify an access token's signature, structure and expiry
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode_claims(token, &self.access_decoding)?;
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    /// Verify a refresh token and return its subject
    pub fn verify_refresh(&self, token: &str) -> Result<String, TokenError> {
        let claims: RefreshClaims = self.decode_claims(token, &self.refresh_decoding)?;
        self.check_expiry(claims.exp)?;
        Ok(claims.sub)
    }

    fn sign<T: Serialize>(&self, claims: &T, key: &EncodingKey) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, key).map_err(|e| {
            tracing::error!(error = %e, event = "token_signing_failed", "Failed to sign token");
            DomainError::Token(TokenError::GenerationFailed)
        })
    }

    fn decode_claims<T: DeserializeOwned>(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<T, TokenError> {
        decode::<T>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token failed verification");
                TokenError::SignatureInvalid
            })
    }

    fn check_expiry(&self, exp: i64) -> Result<(), TokenError> {
        if exp <= self.clock.now().timestamp() {
            Err(TokenError::Expired)
        } else {
            Ok(())
        }
    }
}
