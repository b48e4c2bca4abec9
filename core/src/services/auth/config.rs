//! Configuration for the authentication service

use idn_shared::phone::CountryCode;
use idn_shared::AppConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Numbering plan used to normalize phone-number usernames
    pub country_code: CountryCode,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            country_code: CountryCode::AM,
        }
    }
}

impl AuthServiceConfig {
    /// Falls back to the default country when the configured one is unknown
    pub fn from_app_config(config: &AppConfig) -> Self {
        let country_code = config.app_country_code.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default country code");
            CountryCode::AM
        });
        Self { country_code }
    }
}
