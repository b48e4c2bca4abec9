//! Main verification service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{AccountType, TokenPurpose, VerificationToken};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::VerificationTokenRepository;
use crate::services::clock::{Clock, SystemClock};
use crate::services::crypto::{hash_secret, secret_matches, PasswordEncoderTrait};

use super::code::generate_code;
use super::config::VerificationServiceConfig;
use super::types::IssuedCode;

/// Issues and checks stored one-time codes for one account population
///
/// A code's lifecycle is: issued with `attempt_number = 0`, incremented on
/// every check, and deleted exactly once on success, expiry or exhaustion.
pub struct VerificationService<R, P>
where
    R: VerificationTokenRepository + ?Sized,
    P: PasswordEncoderTrait + ?Sized,
{
    repository: Arc<R>,
    encoder: Arc<P>,
    config: VerificationServiceConfig,
    account_type: AccountType,
    clock: Arc<dyn Clock>,
}

impl<R, P> VerificationService<R, P>
where
    R: VerificationTokenRepository + ?Sized,
    P: PasswordEncoderTrait + ?Sized + 'static,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `repository` - Token rows of this account type
    /// * `encoder` - One-way hash used for stored codes
    /// * `config` - Lifetime, attempt and cooldown limits
    /// * `account_type` - Population the stored tokens belong to
    pub fn new(
        repository: Arc<R>,
        encoder: Arc<P>,
        config: VerificationServiceConfig,
        account_type: AccountType,
    ) -> Self {
        Self::with_clock(repository, encoder, config, account_type, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<R>,
        encoder: Arc<P>,
        config: VerificationServiceConfig,
        account_type: AccountType,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            encoder,
            config,
            account_type,
            clock,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a new code for (account, purpose)
    ///
    /// Fails with `ResendNotAllowed` while an unexpired token created inside the
    /// cooldown exists. Any other previous token is replaced.
    pub async fn issue(&self, account_id: i64, purpose: TokenPurpose) -> DomainResult<IssuedCode> {
        let now = self.clock.now();

        if let Some(existing) = self.repository.find(account_id, purpose).await? {
            let cooldown = self.config.resend_cooldown();
            if !existing.is_expired_at(now, self.config.code_lifetime())
                && !existing.resend_allowed_at(now, cooldown)
            {
                let retry_after_seconds = existing.resend_wait_seconds(now, cooldown);
                tracing::info!(
                    account_type = %self.account_type,
                    account_id = account_id,
                    purpose = %purpose,
                    retry_after_seconds = retry_after_seconds,
                    event = "code_resend_throttled",
                    "Code requested inside resend cooldown"
                );
                return Err(VerificationError::ResendNotAllowed { retry_after_seconds }.into());
            }
            self.repository.delete(existing.id).await?;
        }

        let code = generate_code();
        let code_hash = hash_secret(&self.encoder, &code).await?;
        let token = VerificationToken::new(self.account_type, account_id, purpose, code_hash, now);

        let stored = match self.repository.insert(token).await {
            Ok(stored) => stored,
            // A concurrent issue won the unique (account, purpose) slot
            Err(DomainError::Conflict { .. }) => {
                return Err(VerificationError::ResendNotAllowed {
                    retry_after_seconds: self.config.resend_cooldown_seconds.max(1),
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            account_type = %self.account_type,
            account_id = account_id,
            purpose = %purpose,
            token_id = stored.id,
            event = "code_issued",
            "Issued one-time code"
        );

        Ok(IssuedCode {
            token_id: stored.id,
            code,
            created_at: stored.created_at,
        })
    }

    /// Check a presented code
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Code matched; the token is consumed
    /// * `Ok(false)` - Wrong code; attempts remain
    /// * `Err(ActionNotAllowed)` - No token exists (or it was consumed concurrently)
    /// * `Err(TokenExpired)` - Token outlived its lifetime and was deleted
    /// * `Err(MaxAttemptsExceeded)` - Attempts are used up and the token was deleted
    pub async fn verify(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
        presented_code: &str,
    ) -> DomainResult<bool> {
        let token = self
            .repository
            .find(account_id, purpose)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    account_type = %self.account_type,
                    account_id = account_id,
                    purpose = %purpose,
                    event = "code_check_without_token",
                    "Code checked with no pending token"
                );
                VerificationError::not_allowed("no pending verification token")
            })?;

        if token.is_expired_at(self.clock.now(), self.config.code_lifetime()) {
            self.repository.delete(token.id).await?;
            tracing::info!(
                account_type = %self.account_type,
                account_id = account_id,
                purpose = %purpose,
                event = "code_expired",
                "Verification token expired"
            );
            return Err(VerificationError::TokenExpired.into());
        }

        let attempts = self
            .repository
            .increment_attempts(token.id)
            .await?
            .ok_or_else(|| VerificationError::not_allowed("verification token already consumed"))?;

        if attempts > self.config.max_attempts {
            return self.exhaust(&token, attempts).await;
        }

        if secret_matches(&self.encoder, presented_code, &token.code_hash).await? {
            if !self.repository.delete(token.id).await? {
                return Err(VerificationError::not_allowed("verification token already consumed").into());
            }
            tracing::info!(
                account_type = %self.account_type,
                account_id = account_id,
                purpose = %purpose,
                attempts = attempts,
                event = "code_verified",
                "One-time code verified"
            );
            return Ok(true);
        }

        if attempts >= self.config.max_attempts {
            return self.exhaust(&token, attempts).await;
        }

        tracing::info!(
            account_type = %self.account_type,
            account_id = account_id,
            purpose = %purpose,
            attempts = attempts,
            event = "code_mismatch",
            "Wrong one-time code"
        );
        Ok(false)
    }

    /// `now > last_issued_at + cooldown`
    pub fn resend_allowed(&self, last_issued_at: DateTime<Utc>) -> bool {
        self.clock.now() > last_issued_at + self.config.resend_cooldown()
    }

    /// Whether a token exists for (account, purpose)
    pub async fn has_pending(&self, account_id: i64, purpose: TokenPurpose) -> DomainResult<bool> {
        self.repository.exists(account_id, purpose).await
    }

    /// Delete any token for (account, purpose)
    ///
    /// Used to roll back an issued code whose delivery failed and to cancel a
    /// competing recovery channel.
    pub async fn discard(&self, account_id: i64, purpose: TokenPurpose) -> DomainResult<bool> {
        self.repository
            .delete_by_account_and_purpose(account_id, purpose)
            .await
    }

    async fn exhaust(&self, token: &VerificationToken, attempts: i32) -> DomainResult<bool> {
        self.repository.delete(token.id).await?;
        tracing::warn!(
            account_type = %self.account_type,
            account_id = token.account_id,
            purpose = %token.purpose,
            attempts = attempts,
            event = "code_attempts_exhausted",
            "Verification attempts exhausted, token discarded"
        );
        Err(VerificationError::MaxAttemptsExceeded.into())
    }
}
