//! Application state shared by every worker
//!
//! Services are built over trait objects so the same state type serves the
//! MySQL/Redis deployment and the in-memory collaborators used by tests.

use std::sync::Arc;

use idn_core::domain::entities::AccountType;
use idn_core::repositories::{AccountRepository, VerificationTokenRepository};
use idn_core::services::auth::AuthServiceConfig;
use idn_core::services::{
    AccountService, AccountServiceConfig, AuthGateway, AuthService, BcryptPasswordEncoder,
    CacheServiceTrait, Clock, DependencyHealthTrait, MailSenderTrait, OtpProviderTrait,
    PasswordEncoderTrait, PhoneVerificationService, SystemClock, TokenIssuer, TokenIssuerConfig,
    VerificationService, VerificationServiceConfig,
};
use idn_core::DomainResult;
use idn_shared::AppConfig;

pub type DynAuthService =
    AuthService<dyn AccountRepository, dyn CacheServiceTrait, dyn PasswordEncoderTrait>;

pub type DynAuthGateway =
    AuthGateway<dyn AccountRepository, dyn CacheServiceTrait, dyn PasswordEncoderTrait>;

pub type DynAccountService = AccountService<
    dyn AccountRepository,
    dyn CacheServiceTrait,
    dyn PasswordEncoderTrait,
    dyn VerificationTokenRepository,
    dyn OtpProviderTrait,
    dyn MailSenderTrait,
>;

/// Stores of one account population
#[derive(Clone)]
pub struct PopulationStores {
    pub accounts: Arc<dyn AccountRepository>,
    pub verification_tokens: Arc<dyn VerificationTokenRepository>,
}

/// Everything the services are built from
#[derive(Clone)]
pub struct Collaborators {
    pub primary: PopulationStores,
    pub operator: PopulationStores,
    pub cache: Arc<dyn CacheServiceTrait>,
    pub otp: Arc<dyn OtpProviderTrait>,
    pub mail: Arc<dyn MailSenderTrait>,
    pub encoder: Arc<dyn PasswordEncoderTrait>,
    pub clock: Arc<dyn Clock>,
    pub health: Arc<dyn DependencyHealthTrait>,
}

impl Collaborators {
    /// Wire the MySQL repositories, Redis cache and providers
    pub fn from_infrastructure(infra: &idn_infra::InfrastructureServices) -> Self {
        let stores = |account_type: AccountType| {
            let stores = infra.stores(account_type);
            PopulationStores {
                accounts: stores.accounts.clone(),
                verification_tokens: stores.verification_tokens.clone(),
            }
        };

        Self {
            primary: stores(AccountType::Primary),
            operator: stores(AccountType::Operator),
            cache: infra.cache.clone(),
            otp: infra.otp.clone(),
            mail: infra.mail.clone(),
            encoder: Arc::new(BcryptPasswordEncoder::default()),
            clock: Arc::new(SystemClock),
            health: infra.health(),
        }
    }

    fn stores(&self, account_type: AccountType) -> &PopulationStores {
        match account_type {
            AccountType::Primary => &self.primary,
            AccountType::Operator => &self.operator,
        }
    }
}

/// Services of both account types plus the path-based gateway
#[derive(Clone)]
pub struct AppState {
    pub gateway: DynAuthGateway,
    pub health: Arc<dyn DependencyHealthTrait>,
    primary: Arc<DynAccountService>,
    operator: Arc<DynAccountService>,
}

impl AppState {
    /// Build the services of both account types
    ///
    /// The token issuer is shared; everything else is per account type.
    pub fn assemble(collaborators: Collaborators, config: &AppConfig) -> DomainResult<Self> {
        let issuer_config = TokenIssuerConfig::from_jwt_config(&config.jwt)?;
        let issuer = Arc::new(TokenIssuer::with_clock(
            issuer_config,
            collaborators.clock.clone(),
        ));

        let build = |account_type: AccountType| -> Arc<DynAccountService> {
            let stores = collaborators.stores(account_type);
            let auth: Arc<DynAuthService> = Arc::new(AuthService::new(
                account_type,
                stores.accounts.clone(),
                collaborators.cache.clone(),
                issuer.clone(),
                collaborators.encoder.clone(),
                AuthServiceConfig::from_app_config(config),
            ));
            let verification = Arc::new(VerificationService::with_clock(
                stores.verification_tokens.clone(),
                collaborators.encoder.clone(),
                VerificationServiceConfig::from_limits(&config.limits),
                account_type,
                collaborators.clock.clone(),
            ));
            let phone = Arc::new(PhoneVerificationService::with_clock(
                collaborators.cache.clone(),
                collaborators.otp.clone(),
                VerificationServiceConfig::from_limits(&config.limits),
                collaborators.clock.clone(),
            ));

            Arc::new(AccountService::new(
                auth,
                verification,
                phone,
                collaborators.mail.clone(),
                collaborators.cache.clone(),
                AccountServiceConfig::from_limits(&config.limits),
            ))
        };

        let primary = build(AccountType::Primary);
        let operator = build(AccountType::Operator);
        let gateway = AuthGateway::new(primary.auth().clone(), operator.auth().clone());

        Ok(Self {
            gateway,
            health: collaborators.health.clone(),
            primary,
            operator,
        })
    }

    /// Account flows of `account_type`
    pub fn accounts(&self, account_type: AccountType) -> &Arc<DynAccountService> {
        match account_type {
            AccountType::Primary => &self.primary,
            AccountType::Operator => &self.operator,
        }
    }

    /// Authentication service owning `path`
    pub fn auth_for_path(&self, path: &str) -> &Arc<DynAuthService> {
        self.gateway.for_path(path)
    }
}
