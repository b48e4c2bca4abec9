//! Phone/email verification and credential changes for a signed-up account

use std::sync::Arc;

use crate::domain::entities::{Account, TokenPair, TokenPurpose};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError, VerificationError};
use crate::repositories::{AccountRepository, VerificationTokenRepository};
use crate::services::auth::AuthService;
use crate::services::cache::CacheServiceTrait;
use crate::services::crypto::{hash_secret, secret_matches, PasswordEncoderTrait};
use crate::services::verification::{
    MailSenderTrait, OtpProviderTrait, PhoneVerificationService, VerificationService,
};

use super::config::AccountServiceConfig;

/// Account flows for one account type
///
/// Composes the authentication service (credential checks, minting and
/// pinning) with stored-code verification, phone OTP and mail delivery.
pub struct AccountService<A, C, P, V, O, M>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized,
    V: VerificationTokenRepository + ?Sized,
    O: OtpProviderTrait + ?Sized,
    M: MailSenderTrait + ?Sized,
{
    pub(super) auth: Arc<AuthService<A, C, P>>,
    pub(super) verification: Arc<VerificationService<V, P>>,
    pub(super) phone: Arc<PhoneVerificationService<C, O>>,
    pub(super) mail: Arc<M>,
    /// Holds password reset grants
    pub(super) cache: Arc<C>,
    pub(super) config: AccountServiceConfig,
}

impl<A, C, P, V, O, M> AccountService<A, C, P, V, O, M>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized + 'static,
    V: VerificationTokenRepository + ?Sized,
    O: OtpProviderTrait + ?Sized,
    M: MailSenderTrait + ?Sized,
{
    pub fn new(
        auth: Arc<AuthService<A, C, P>>,
        verification: Arc<VerificationService<V, P>>,
        phone: Arc<PhoneVerificationService<C, O>>,
        mail: Arc<M>,
        cache: Arc<C>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            auth,
            verification,
            phone,
            mail,
            cache,
            config,
        }
    }

    pub fn auth(&self) -> &Arc<AuthService<A, C, P>> {
        &self.auth
    }

    /// Send a phone OTP after re-checking credentials
    ///
    /// Returns the account id the confirmation step refers to. Fails with
    /// `DeliveryFailed` when the provider refuses the request.
    pub async fn start_phone_verification(&self, username: &str, password: &str) -> DomainResult<i64> {
        let account = self.auth.check_credentials(username, password).await?;
        if !account.active {
            return Err(AuthError::AccountNotActive.into());
        }
        if account.phone_verified {
            return Err(already_verified("phone"));
        }

        if !self.phone.start_verification(&account.phone_number).await? {
            return Err(VerificationError::DeliveryFailed.into());
        }
        Ok(account.id)
    }

    /// Confirm the phone OTP, mark the phone verified and sign the account in
    pub async fn confirm_phone_verification(
        &self,
        account_id: i64,
        code: &str,
        issuer_path: &str,
    ) -> DomainResult<TokenPair> {
        let account = self.find_by_id(account_id).await?;
        if account.phone_verified {
            return Err(already_verified("phone"));
        }
        if !account.active {
            return Err(VerificationError::not_allowed("phone verification not pending").into());
        }

        if !self.phone.confirm_verification(&account.phone_number, code).await? {
            return Err(VerificationError::invalid_token("token").into());
        }

        self.auth.accounts().set_phone_verified(account.id).await?;
        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            event = "phone_verified",
            "Phone number verified"
        );

        let account = Account {
            phone_verified: true,
            ..account
        };
        self.auth.provide_tokens(&account, issuer_path).await
    }

    /// Mail an email confirmation code to the signed-in account
    ///
    /// Returns `Ok(false)` when delivery fails; the stored code is discarded.
    pub async fn start_email_verification(&self, subject: &str) -> DomainResult<bool> {
        let account = self.find_by_subject(subject).await?;
        if account.email_verified {
            return Err(already_verified("email"));
        }

        let issued = self.verification.issue(account.id, TokenPurpose::EmailConfirm).await?;

        if let Err(e) = self.mail.send_email_verification(&account.email, &issued.code).await {
            tracing::error!(
                account_type = %self.auth.account_type(),
                account_id = account.id,
                error = %e,
                event = "email_delivery_failed",
                "Email verification message not delivered"
            );
            self.verification
                .discard(account.id, TokenPurpose::EmailConfirm)
                .await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Check the emailed code and mark the email verified
    pub async fn confirm_email_verification(&self, subject: &str, code: &str) -> DomainResult<()> {
        let account = self.find_by_subject(subject).await?;
        if account.email_verified {
            return Err(already_verified("email"));
        }

        if !self
            .verification
            .verify(account.id, TokenPurpose::EmailConfirm, code)
            .await?
        {
            return Err(VerificationError::invalid_token("token").into());
        }

        self.auth.accounts().set_email_verified(account.id).await?;
        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            event = "email_verified",
            "Email verified"
        );
        Ok(())
    }

    /// Move the account to a new email and re-issue its session
    ///
    /// Sessions pinned under the old email are interrupted. The whole flow is
    /// bounded by the multi-step timeout.
    pub async fn update_email(
        &self,
        subject: &str,
        password: &str,
        new_email: &str,
        issuer_path: &str,
    ) -> DomainResult<TokenPair> {
        tokio::time::timeout(
            self.config.multi_step_timeout(),
            self.change_email(subject, password, new_email, issuer_path),
        )
        .await
        .map_err(|_| {
            tracing::error!(
                account_type = %self.auth.account_type(),
                subject = %subject,
                event = "email_update_timeout",
                "Email update timed out"
            );
            DomainError::Timeout {
                operation: "update_email".to_string(),
            }
        })?
    }

    async fn change_email(
        &self,
        subject: &str,
        password: &str,
        new_email: &str,
        issuer_path: &str,
    ) -> DomainResult<TokenPair> {
        let mut account = self.auth.check_credentials(subject, password).await?;
        let old_subject = account.subject();
        let new_email = new_email.trim().to_lowercase();

        if new_email == old_subject {
            return Err(ValidationError::SameEmail.into());
        }
        if self.auth.accounts().email_exists(&new_email).await? {
            return Err(DomainError::Conflict {
                field: "email".to_string(),
            });
        }

        account.change_email(&new_email);
        self.auth.accounts().update_email_and_purge_tokens(&account).await?;
        self.auth.interrupt(&old_subject).await?;
        let pair = self.auth.provide_tokens(&account, issuer_path).await?;

        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            event = "email_changed",
            "Account email changed"
        );

        if let Err(e) = self.start_email_verification(&new_email).await {
            tracing::warn!(
                account_id = account.id,
                error = %e,
                "Could not start verification of the new email"
            );
        }
        Ok(pair)
    }

    /// Persist a new role and end the account's current session
    pub async fn update_role(&self, account_id: i64, role: &str) -> DomainResult<()> {
        let role = role.trim().to_uppercase();
        if role.is_empty() || !role.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
            }
            .into());
        }

        let account = self
            .auth
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("account {}", account_id)))?;

        self.auth.accounts().update_role(account.id, &role).await?;
        self.auth.interrupt(&account.subject()).await?;

        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            role = %role,
            event = "role_changed",
            "Account role changed"
        );
        Ok(())
    }

    /// Replace the password after checking the current one
    pub async fn change_password(
        &self,
        subject: &str,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let account = self.find_by_subject(subject).await?;
        let encoder = self.auth.encoder();

        if !secret_matches(encoder, old_password, &account.password_hash).await? {
            return Err(ValidationError::InvalidOldPassword.into());
        }
        if old_password == new_password {
            return Err(ValidationError::PasswordReused.into());
        }

        let hash = hash_secret(encoder, new_password).await?;
        self.auth.accounts().update_password(account.id, &hash).await?;

        tracing::info!(
            account_type = %self.auth.account_type(),
            account_id = account.id,
            event = "password_changed",
            "Password changed"
        );
        Ok(())
    }

    pub(super) async fn find_by_id(&self, account_id: i64) -> DomainResult<Account> {
        self.auth
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| VerificationError::not_allowed("unknown account").into())
    }

    async fn find_by_subject(&self, subject: &str) -> DomainResult<Account> {
        self.auth
            .accounts()
            .find_by_email(&subject.to_lowercase())
            .await?
            .ok_or_else(|| VerificationError::not_allowed("unknown account").into())
    }
}

fn already_verified(channel: &str) -> DomainError {
    VerificationError::AlreadyVerified {
        channel: channel.to_string(),
    }
    .into()
}
