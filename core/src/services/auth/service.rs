//! Main authentication service implementation

use std::sync::Arc;

use idn_shared::phone::{mask_phone_number, normalize_phone_number};

use crate::domain::entities::{strip_bearer_prefix, Account, AccountType, TokenPair, REFRESH_TOKEN_HEADER};
use crate::domain::value_objects::Principal;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::AccountRepository;
use crate::services::cache::CacheServiceTrait;
use crate::services::crypto::{secret_matches, PasswordEncoderTrait};
use crate::services::session::{token_fingerprint, SessionPinStore};
use crate::services::token::TokenIssuer;

use super::audit::{AuditSink, AuthEvent, AuthEventKind, TracingAuditSink};
use super::config::AuthServiceConfig;

/// Login, request authentication, refresh and logout for one account type
///
/// Two instances exist, one per [`AccountType`]. They share the token issuer
/// but each has its own account store and pin namespace, so sessions of one
/// population can never validate against the other.
pub struct AuthService<A, C, P>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized,
{
    /// Credential store of this account type
    accounts: Arc<A>,
    /// Pins of this account type
    pins: SessionPinStore<C>,
    /// Shared signer/verifier
    issuer: Arc<TokenIssuer>,
    /// Password hash comparison
    encoder: Arc<P>,
    /// Audit event destination
    audit: Arc<dyn AuditSink>,
    config: AuthServiceConfig,
}

impl<A, C, P> AuthService<A, C, P>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized + 'static,
{
    /// Create a new authentication service that audits through `tracing`
    ///
    /// # Arguments
    ///
    /// * `account_type` - Population served by this instance
    /// * `accounts` - Credential store for that population
    /// * `cache` - Shared cache backing the session pins
    /// * `issuer` - Token issuer shared by both populations
    /// * `encoder` - Password hash comparison
    /// * `config` - Service configuration
    pub fn new(
        account_type: AccountType,
        accounts: Arc<A>,
        cache: Arc<C>,
        issuer: Arc<TokenIssuer>,
        encoder: Arc<P>,
        config: AuthServiceConfig,
    ) -> Self {
        Self::with_audit(
            account_type,
            accounts,
            cache,
            issuer,
            encoder,
            Arc::new(TracingAuditSink),
            config,
        )
    }

    /// Create a new authentication service with an explicit audit sink
    pub fn with_audit(
        account_type: AccountType,
        accounts: Arc<A>,
        cache: Arc<C>,
        issuer: Arc<TokenIssuer>,
        encoder: Arc<P>,
        audit: Arc<dyn AuditSink>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            accounts,
            pins: SessionPinStore::new(cache, account_type),
            issuer,
            encoder,
            audit,
            config,
        }
    }

    pub fn account_type(&self) -> AccountType {
        self.pins.account_type()
    }

    /// Sign in with an email or phone number and a password
    ///
    /// The password is checked before account status so a wrong password
    /// never reveals whether an account is disabled.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Freshly minted and pinned pair
    /// * `Err(DomainError::Auth(_))` - One of the login failure causes
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        issuer_path: &str,
    ) -> DomainResult<TokenPair> {
        let result = self.try_login(username, password, issuer_path).await;

        match &result {
            Ok((subject, _)) => self.audit.record(&AuthEvent::new(
                AuthEventKind::LoginSucceeded,
                self.account_type(),
                subject,
                issuer_path,
            )),
            Err(DomainError::Auth(cause)) => {
                tracing::warn!(
                    account_type = %self.account_type(),
                    username = %mask_username(username),
                    cause = %cause,
                    event = "login_failed",
                    "Login rejected"
                );
                self.audit.record(
                    &AuthEvent::new(
                        AuthEventKind::LoginFailed,
                        self.account_type(),
                        &mask_username(username),
                        issuer_path,
                    )
                    .with_cause(cause.to_string()),
                );
            }
            Err(_) => {}
        }

        result.map(|(_, pair)| pair)
    }

    async fn try_login(
        &self,
        username: &str,
        password: &str,
        issuer_path: &str,
    ) -> DomainResult<(String, TokenPair)> {
        let account = self.check_credentials(username, password).await?;

        if !account.active {
            return Err(AuthError::AccountNotActive.into());
        }
        if self.account_type().requires_phone_verification() && !account.phone_verified {
            return Err(AuthError::PhoneNumberNotVerified.into());
        }

        let pair = self.provide_tokens(&account, issuer_path).await?;
        Ok((account.subject(), pair))
    }

    /// Look up an account by email (contains `@`) or phone number
    ///
    /// A phone number that does not validate yields `Ok(None)`.
    pub async fn find_by_username(&self, username: &str) -> DomainResult<Option<Account>> {
        let username = username.trim();
        if username.contains('@') {
            return self.accounts.find_by_email(&username.to_lowercase()).await;
        }
        match normalize_phone_number(username, self.config.country_code) {
            Some(phone) => self.accounts.find_by_phone_number(&phone).await,
            None => Ok(None),
        }
    }

    /// Resolve an account and compare its password hash, without status checks
    ///
    /// Unknown usernames and wrong passwords are both `InvalidCredentials`.
    pub async fn check_credentials(&self, username: &str, password: &str) -> DomainResult<Account> {
        let account = self
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !secret_matches(&self.encoder, password, &account.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(account)
    }

    /// Mint a pair for `account` and pin it, superseding any prior session
    pub async fn provide_tokens(&self, account: &Account, issuer_path: &str) -> DomainResult<TokenPair> {
        let pair = self
            .issuer
            .mint(&account.subject(), &account.authorities(), issuer_path)?;
        self.pins.pin(&account.subject(), &pair).await?;
        Ok(pair)
    }

    /// Authenticate a request from its `Authorization` header value
    ///
    /// # Returns
    ///
    /// * `Ok(Some(principal))` - Verified and still pinned
    /// * `Ok(None)` - No usable credential; the caller stays anonymous
    /// * `Err(Token(Stale))` - Verified but superseded
    /// * `Err(Internal)` - Pin store unavailable
    pub async fn authenticate(&self, authorization: Option<&str>) -> DomainResult<Option<Principal>> {
        let Some(token) = authorization.and_then(strip_bearer_prefix) else {
            return Ok(None);
        };

        let claims = match self.issuer.verify_access(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(
                    account_type = %self.account_type(),
                    cause = %e,
                    "Bearer token rejected, continuing anonymously"
                );
                return Ok(None);
            }
        };

        if self.pins.is_access_token_stale(&claims.sub, token).await? {
            tracing::warn!(
                account_type = %self.account_type(),
                subject = %claims.sub,
                token = %token_fingerprint(token),
                event = "stale_access_token",
                "Superseded access token presented"
            );
            return Err(TokenError::Stale.into());
        }

        Ok(Some(Principal::from_claims(self.account_type(), &claims)))
    }

    /// Exchange a pinned refresh token for a new pair
    ///
    /// The subject comes only from the refresh token itself.
    pub async fn refresh(&self, refresh_header: Option<&str>, issuer_path: &str) -> DomainResult<TokenPair> {
        let token = refresh_header
            .and_then(strip_bearer_prefix)
            .ok_or_else(|| TokenError::MissingHeader {
                header: REFRESH_TOKEN_HEADER.to_string(),
            })?;

        let subject = self.issuer.verify_refresh(token).map_err(|e| {
            tracing::warn!(
                account_type = %self.account_type(),
                cause = %e,
                event = "refresh_untrusted",
                "Refresh token failed verification"
            );
            TokenError::RefreshUntrusted
        })?;

        if self.pins.is_refresh_token_stale(&subject, token).await? {
            tracing::warn!(
                account_type = %self.account_type(),
                subject = %subject,
                token = %token_fingerprint(token),
                event = "stale_refresh_token",
                "Superseded refresh token presented"
            );
            return Err(TokenError::InvalidRefresh.into());
        }

        let account = self
            .accounts
            .find_by_email(&subject)
            .await?
            .filter(|a| self.is_active_account(a))
            .ok_or(TokenError::InvalidRefresh)?;

        let pair = self.provide_tokens(&account, issuer_path).await?;
        self.audit.record(&AuthEvent::new(
            AuthEventKind::TokenRefreshed,
            self.account_type(),
            &subject,
            issuer_path,
        ));
        Ok(pair)
    }

    /// End the session of the caller's currently pinned access token
    pub async fn logout(&self, authorization: Option<&str>, path: &str) -> DomainResult<()> {
        let principal = self
            .authenticate(authorization)
            .await?
            .ok_or(AuthError::AuthenticationError)?;

        self.pins.interrupt(&principal.subject).await?;
        self.audit.record(&AuthEvent::new(
            AuthEventKind::LoggedOut,
            self.account_type(),
            &principal.subject,
            path,
        ));
        Ok(())
    }

    /// Drop any pinned session of `subject`
    pub async fn interrupt(&self, subject: &str) -> DomainResult<()> {
        self.pins.interrupt(subject).await
    }

    /// Active and, where required, phone-verified
    pub fn is_active_account(&self, account: &Account) -> bool {
        account.active
            && (!self.account_type().requires_phone_verification() || account.phone_verified)
    }

    pub fn accounts(&self) -> &Arc<A> {
        &self.accounts
    }

    pub fn encoder(&self) -> &Arc<P> {
        &self.encoder
    }

    pub fn country_code(&self) -> idn_shared::phone::CountryCode {
        self.config.country_code
    }
}

fn mask_username(username: &str) -> String {
    match username.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain.to_lowercase())
        }
        None => mask_phone_number(username.trim()),
    }
}
