//! Password recovery by email code or phone OTP
//!
//! Both channels end in the same [`PasswordResetGrant`], which the final
//! password-set step consumes. Only one channel may be in flight: starting the
//! phone channel cancels a pending email code, and a pending email code blocks
//! phone confirmation.

use constant_time_eq::constant_time_eq;

use crate::domain::entities::{Account, PasswordResetGrant, TokenPurpose};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::{AccountRepository, VerificationTokenRepository};
use crate::services::cache::CacheServiceTrait;
use crate::services::crypto::{hash_secret, PasswordEncoderTrait};
use crate::services::verification::{MailSenderTrait, OtpProviderTrait};

use super::service::AccountService;

impl<A, C, P, V, O, M> AccountService<A, C, P, V, O, M>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized + 'static,
    V: VerificationTokenRepository + ?Sized,
    O: OtpProviderTrait + ?Sized,
    M: MailSenderTrait + ?Sized,
{
    /// Start recovery for an email or phone-number username
    ///
    /// Returns `Ok(false)` for unknown or inactive accounts and failed
    /// deliveries, never revealing which.
    pub async fn send_reset_message(&self, username: &str) -> DomainResult<bool> {
        let account = match self.auth.find_by_username(username).await? {
            Some(account) if self.auth.is_active_account(&account) => account,
            _ => {
                tracing::warn!(
                    account_type = %self.auth.account_type(),
                    event = "reset_unknown_account",
                    "Password reset requested for unknown or inactive account"
                );
                return Ok(false);
            }
        };

        if username.contains('@') {
            self.send_reset_email(&account).await
        } else {
            self.send_reset_sms(&account).await
        }
    }

    async fn send_reset_email(&self, account: &Account) -> DomainResult<bool> {
        if !account.email_verified {
            tracing::warn!(
                account_id = account.id,
                event = "reset_unverified_email",
                "Password reset by unverified email refused"
            );
            return Ok(false);
        }

        let issued = match self
            .verification
            .issue(account.id, TokenPurpose::PasswordReset)
            .await
        {
            Ok(issued) => issued,
            Err(DomainError::Verification(VerificationError::ResendNotAllowed { .. })) => {
                tracing::warn!(
                    account_id = account.id,
                    event = "reset_resend_throttled",
                    "Reset code already sent inside cooldown"
                );
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.mail.send_password_reset(&account.email, &issued.code).await {
            tracing::error!(
                account_id = account.id,
                error = %e,
                event = "reset_delivery_failed",
                "Password reset mail not delivered"
            );
            self.verification
                .discard(account.id, TokenPurpose::PasswordReset)
                .await?;
            return Ok(false);
        }

        self.revoke_grant(account.id).await?;
        Ok(true)
    }

    async fn send_reset_sms(&self, account: &Account) -> DomainResult<bool> {
        // The email channel is cancelled even if the SMS cannot be sent
        self.verification
            .discard(account.id, TokenPurpose::PasswordReset)
            .await?;

        match self.phone.start_verification(&account.phone_number).await {
            Ok(true) => {}
            Ok(false) => return Ok(false),
            Err(DomainError::Verification(VerificationError::ResendNotAllowed { .. })) => {
                tracing::warn!(
                    account_id = account.id,
                    event = "reset_resend_throttled",
                    "Reset SMS already sent inside cooldown"
                );
                return Ok(true);
            }
            Err(e) => return Err(e),
        }

        self.revoke_grant(account.id).await?;
        Ok(true)
    }

    /// Exchange a recovery code for a single-use reset grant
    pub async fn verify_reset_token(&self, username: &str, code: &str) -> DomainResult<PasswordResetGrant> {
        let account = self
            .auth
            .find_by_username(username)
            .await?
            .filter(|a| self.auth.is_active_account(a))
            .ok_or_else(|| VerificationError::not_allowed("unknown or inactive account"))?;

        let verified = if username.contains('@') {
            self.verification
                .verify(account.id, TokenPurpose::PasswordReset, code)
                .await?
        } else {
            if self
                .verification
                .has_pending(account.id, TokenPurpose::PasswordReset)
                .await?
            {
                tracing::warn!(
                    account_id = account.id,
                    event = "reset_channel_conflict",
                    "Phone reset confirmation while an email reset is pending"
                );
                return Err(VerificationError::not_allowed("conflicting recovery channel").into());
            }
            self.phone
                .confirm_verification(&account.phone_number, code)
                .await?
        };

        if !verified {
            return Err(VerificationError::invalid_token("token").into());
        }

        let grant = PasswordResetGrant::new(account.id);
        self.cache
            .set_with_expiry(&self.grant_key(account.id), &grant.token, self.config.grant_ttl_seconds())
            .await
            .map_err(|e| grant_cache_error("store", e))?;

        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            event = "reset_grant_issued",
            "Password reset grant issued"
        );
        Ok(grant)
    }

    /// Consume a reset grant and set the new password
    ///
    /// All sessions of the account are ended.
    pub async fn reset_password(
        &self,
        account_id: i64,
        grant_token: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let key = self.grant_key(account_id);
        let not_allowed = || DomainError::from(VerificationError::not_allowed("invalid reset grant"));

        // Compare before consuming so a wrong token cannot burn a valid grant
        let cached = self
            .cache
            .get(&key)
            .await
            .map_err(|e| grant_cache_error("read", e))?;
        if !matches_grant(cached.as_deref(), grant_token) {
            tracing::warn!(
                account_id = account_id,
                event = "reset_grant_mismatch",
                "Password reset with invalid grant"
            );
            return Err(not_allowed());
        }

        let consumed = self
            .cache
            .get_and_delete(&key)
            .await
            .map_err(|e| grant_cache_error("consume", e))?;
        if !matches_grant(consumed.as_deref(), grant_token) {
            return Err(not_allowed());
        }

        let account = self.find_by_id(account_id).await.map_err(|_| not_allowed())?;
        let hash = hash_secret(self.auth.encoder(), new_password).await?;
        self.auth.accounts().update_password(account.id, &hash).await?;
        self.auth.interrupt(&account.subject()).await?;

        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            event = "password_reset",
            "Password reset completed"
        );
        Ok(())
    }

    fn grant_key(&self, account_id: i64) -> String {
        self.auth
            .account_type()
            .password_reset_namespace()
            .key(account_id)
    }

    async fn revoke_grant(&self, account_id: i64) -> DomainResult<()> {
        self.cache
            .delete(&self.grant_key(account_id))
            .await
            .map(|_| ())
            .map_err(|e| grant_cache_error("revoke", e))
    }
}

fn matches_grant(cached: Option<&str>, presented: &str) -> bool {
    cached.is_some_and(|cached| constant_time_eq(cached.as_bytes(), presented.as_bytes()))
}

fn grant_cache_error(operation: &str, error: String) -> DomainError {
    tracing::error!(
        operation = operation,
        error = %error,
        event = "reset_grant_cache_failure",
        "Cache unavailable for password reset grant"
    );
    DomainError::internal(format!("reset grant {} failed", operation))
}
