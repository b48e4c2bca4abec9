//! Twilio Verify credentials

use serde::{Deserialize, Serialize};

use super::env_or;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Verify service SID (`VA...`)
    pub verify_service_sid: String,
    /// Timeout for provider requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl TwilioConfig {
    pub fn from_env() -> Self {
        Self {
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            verify_service_sid: std::env::var("TWILIO_VERIFY_SERVICE_SID").unwrap_or_default(),
            request_timeout_secs: env_or("TWILIO_REQUEST_TIMEOUT_SECS", default_request_timeout_secs()),
        }
    }

    /// Whether every credential needed to reach the provider is present
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty()
            && !self.auth_token.is_empty()
            && !self.verify_service_sid.is_empty()
    }
}
