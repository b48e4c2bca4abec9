//! Twilio Verify v2 client
//!
//! `send_code` starts an SMS verification and `check_code` asks Twilio whether
//! the presented code is approved. Numbers are validated and formatted as
//! E.164 before any request leaves the process.

use std::time::Duration;

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use idn_core::services::OtpProviderTrait;
use idn_shared::config::TwilioConfig;
use idn_shared::phone::mask_phone_number;

use crate::InfrastructureError;

const DEFAULT_BASE_URL: &str = "https://verify.twilio.com/v2";

/// Verification resource returned by both Verify endpoints
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VerificationResource {
    pub status: String,
    #[serde(default)]
    pub valid: Option<bool>,
}

impl VerificationResource {
    pub(crate) fn is_approved(&self) -> bool {
        self.status == "approved" && self.valid.unwrap_or(true)
    }
}

pub struct TwilioVerifyProvider {
    client: reqwest::Client,
    config: TwilioConfig,
    base_url: String,
}

impl TwilioVerifyProvider {
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Point the client at another Verify-compatible endpoint
    pub fn with_base_url(config: TwilioConfig, base_url: impl Into<String>) -> Result<Self, InfrastructureError> {
        if !config.is_configured() {
            return Err(InfrastructureError::Config(
                "Twilio account SID, auth token and verify service SID are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!("Twilio Verify provider initialized");

        Ok(Self {
            client,
            config,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn verifications_url(&self) -> String {
        format!(
            "{}/Services/{}/Verifications",
            self.base_url, self.config.verify_service_sid
        )
    }

    pub(crate) fn verification_check_url(&self) -> String {
        format!(
            "{}/Services/{}/VerificationCheck",
            self.base_url, self.config.verify_service_sid
        )
    }

    async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<reqwest::Response, InfrastructureError> {
        self.client
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Twilio Verify request failed");
                InfrastructureError::Http(e)
            })
    }

    async fn start(&self, phone: &str) -> Result<(), InfrastructureError> {
        let to = to_e164(phone)?;
        let response = self
            .post(&self.verifications_url(), &[("To", to.as_str()), ("Channel", "sms")])
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                phone = %mask_phone_number(&to),
                status = status.as_u16(),
                body = %body,
                "Twilio Verify refused to start a verification"
            );
            return Err(InfrastructureError::Otp(format!(
                "verification start failed with status {}",
                status
            )));
        }

        let resource: VerificationResource = response.json().await?;
        debug!(
            phone = %mask_phone_number(&to),
            status = %resource.status,
            "Twilio verification started"
        );
        Ok(())
    }

    async fn check(&self, phone: &str, code: &str) -> Result<bool, InfrastructureError> {
        let to = to_e164(phone)?;
        let response = self
            .post(&self.verification_check_url(), &[("To", to.as_str()), ("Code", code)])
            .await?;

        let status = response.status();
        // No pending verification: expired, already approved or out of attempts
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!(
                phone = %mask_phone_number(&to),
                "No pending Twilio verification for number"
            );
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                phone = %mask_phone_number(&to),
                status = status.as_u16(),
                body = %body,
                "Twilio Verify check failed"
            );
            return Err(InfrastructureError::Otp(format!(
                "verification check failed with status {}",
                status
            )));
        }

        let resource: VerificationResource = response.json().await?;
        Ok(resource.is_approved())
    }
}

#[async_trait]
impl OtpProviderTrait for TwilioVerifyProvider {
    async fn send_code(&self, phone: &str) -> Result<(), String> {
        self.start(phone).await.map_err(|e| e.to_string())
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, String> {
        self.check(phone, code).await.map_err(|e| e.to_string())
    }
}

/// Validate a stored number and format it as E.164
pub(crate) fn to_e164(phone: &str) -> Result<String, InfrastructureError> {
    let parsed: PhoneNumber = phone.parse().map_err(|e| {
        warn!(phone = %mask_phone_number(phone), "Unparsable phone number: {}", e);
        InfrastructureError::Otp(format!("invalid phone number: {}", e))
    })?;

    if !phonenumber::is_valid(&parsed) {
        return Err(InfrastructureError::Otp("invalid phone number".to_string()));
    }
    Ok(parsed.format().mode(Mode::E164).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC00000000000000000000000000000000".to_string(),
            auth_token: "token".to_string(),
            verify_service_sid: "VA00000000000000000000000000000000".to_string(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_requires_complete_credentials() {
        let incomplete = TwilioConfig {
            verify_service_sid: String::new(),
            ..config()
        };
        assert!(matches!(
            TwilioVerifyProvider::new(incomplete),
            Err(InfrastructureError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_urls() {
        let provider = TwilioVerifyProvider::with_base_url(config(), "http://localhost:8089/v2/").unwrap();

        assert_eq!(
            provider.verifications_url(),
            "http://localhost:8089/v2/Services/VA00000000000000000000000000000000/Verifications"
        );
        assert_eq!(
            provider.verification_check_url(),
            "http://localhost:8089/v2/Services/VA00000000000000000000000000000000/VerificationCheck"
        );
    }

    #[test]
    fn test_e164_formatting() {
        assert_eq!(to_e164("+37491000001").unwrap(), "+37491000001");
        assert!(to_e164("12345").is_err());
        assert!(to_e164("not a number").is_err());
    }

    #[test]
    fn test_only_approved_checks_pass() {
        let approved: VerificationResource =
            serde_json::from_str(r#"{"status":"approved","valid":true,"sid":"VE1"}"#).unwrap();
        let pending: VerificationResource =
            serde_json::from_str(r#"{"status":"pending","valid":false}"#).unwrap();
        let canceled: VerificationResource = serde_json::from_str(r#"{"status":"canceled"}"#).unwrap();

        assert!(approved.is_approved());
        assert!(!pending.is_approved());
        assert!(!canceled.is_approved());
    }
}
