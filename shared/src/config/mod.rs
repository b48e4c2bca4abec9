//! Configuration module with business-specific sub-modules
//!
//! - `auth` - access/refresh token signing material and lifetimes
//! - `limits` - one-time code lifetimes, attempt limits and resend cooldowns
//! - `cache` - Redis connection settings
//! - `database` - MySQL pool settings
//! - `environment` - deployment environment detection
//! - `server` - HTTP bind settings
//! - `twilio` - OTP provider credentials

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod limits;
pub mod server;
pub mod twilio;

use serde::{Deserialize, Serialize};

pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use limits::LimitsConfig;
pub use server::ServerConfig;
pub use twilio::TwilioConfig;

/// Application country used to validate and normalize phone numbers
pub const DEFAULT_APP_COUNTRY_CODE: &str = "AM";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub jwt: JwtConfig,
    pub limits: LimitsConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    /// ISO country code of the phone numbering plan accepted at login
    #[serde(default = "default_app_country_code")]
    pub app_country_code: String,
}

fn default_app_country_code() -> String {
    DEFAULT_APP_COUNTRY_CODE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            jwt: JwtConfig::default(),
            limits: LimitsConfig::default(),
            twilio: TwilioConfig::default(),
            app_country_code: default_app_country_code(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first when present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            jwt: JwtConfig::from_env(),
            limits: LimitsConfig::from_env(),
            twilio: TwilioConfig::from_env(),
            app_country_code: std::env::var("APP_COUNTRY_CODE")
                .unwrap_or_else(|_| default_app_country_code()),
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when absent or malformed
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
