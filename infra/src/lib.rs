//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the core services depend on:
//!
//! - **Database**: MySQL account and verification token repositories using SQLx
//! - **Cache**: Redis client backing session pins, reset grants and phone
//!   verification markers
//! - **OTP**: Twilio Verify phone code provider, plus a logging provider for
//!   development
//! - **Mail**: outbound verification and password reset messages
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use idn_core::domain::entities::AccountType;
use idn_core::errors::DomainError;
use idn_core::services::{DependencyHealthTrait, MailSenderTrait, OtpProviderTrait};
use idn_shared::config::AppConfig;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and the core cache adapter
pub mod cache;

/// Phone one-time code providers
pub mod otp;

/// Outbound mail
pub mod mail;

#[cfg(feature = "mysql")]
use database::{DatabasePool, MySqlAccountRepository, MySqlVerificationTokenRepository};

use cache::{RedisCacheService, RedisClient};
use mail::LogMailSender;
use otp::{DevOtpProvider, TwilioVerifyProvider};

/// Repositories of one account population
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct AccountStores {
    pub accounts: Arc<MySqlAccountRepository>,
    pub verification_tokens: Arc<MySqlVerificationTokenRepository>,
}

#[cfg(feature = "mysql")]
impl AccountStores {
    fn new(pool: &DatabasePool, account_type: AccountType) -> Self {
        Self {
            accounts: Arc::new(MySqlAccountRepository::new(pool.get_pool().clone(), account_type)),
            verification_tokens: Arc::new(MySqlVerificationTokenRepository::new(
                pool.get_pool().clone(),
                account_type,
            )),
        }
    }
}

/// Infrastructure service container
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct InfrastructureServices {
    pub database: DatabasePool,
    pub cache: Arc<RedisCacheService>,
    pub primary: AccountStores,
    pub operator: AccountStores,
    pub otp: Arc<dyn OtpProviderTrait>,
    pub mail: Arc<dyn MailSenderTrait>,
}

#[cfg(feature = "mysql")]
impl InfrastructureServices {
    pub fn stores(&self, account_type: AccountType) -> &AccountStores {
        match account_type {
            AccountType::Primary => &self.primary,
            AccountType::Operator => &self.operator,
        }
    }

    pub fn health(&self) -> Arc<InfrastructureHealth> {
        Arc::new(InfrastructureHealth {
            database: self.database.clone(),
            cache: self.cache.clone(),
        })
    }

    /// Release pooled connections on shutdown
    pub async fn shutdown(&self) {
        self.database.close().await;
    }
}

/// `SELECT 1` against MySQL and `PING` against Redis
#[cfg(feature = "mysql")]
pub struct InfrastructureHealth {
    database: DatabasePool,
    cache: Arc<RedisCacheService>,
}

#[cfg(feature = "mysql")]
#[async_trait::async_trait]
impl DependencyHealthTrait for InfrastructureHealth {
    async fn database_up(&self) -> bool {
        self.database.health_check().await.unwrap_or(false)
    }

    async fn cache_up(&self) -> bool {
        self.cache.client().health_check().await.unwrap_or(false)
    }
}

/// Connect the database and cache and pick the OTP provider
///
/// Without Twilio credentials a logging OTP provider is used, except in
/// production where missing credentials are a configuration error.
#[cfg(feature = "mysql")]
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing infrastructure services...");

    let database = DatabasePool::new(config.database.clone()).await?;
    let cache = Arc::new(RedisCacheService::new(RedisClient::new(&config.cache).await?));

    let otp = create_otp_provider(config)?;
    let mail: Arc<dyn MailSenderTrait> = Arc::new(LogMailSender::new());

    let services = InfrastructureServices {
        primary: AccountStores::new(&database, AccountType::Primary),
        operator: AccountStores::new(&database, AccountType::Operator),
        database,
        cache,
        otp,
        mail,
    };

    tracing::info!("Infrastructure services initialized successfully");
    Ok(services)
}

/// Choose the phone OTP provider for the configured environment
pub fn create_otp_provider(config: &AppConfig) -> Result<Arc<dyn OtpProviderTrait>, InfrastructureError> {
    if config.twilio.is_configured() {
        return Ok(Arc::new(TwilioVerifyProvider::new(config.twilio.clone())?));
    }
    if config.environment.is_production() {
        return Err(InfrastructureError::Config(
            "Twilio Verify credentials are required in production".to_string(),
        ));
    }
    tracing::warn!("Twilio Verify not configured, phone codes will only be logged");
    Ok(Arc::new(DevOtpProvider::new()))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// OTP provider rejected a request
    #[error("OTP provider error: {0}")]
    Otp(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

/// Store and provider failures surface to the domain as internal errors only
impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::internal(error.to_string())
    }
}
