//! Traits for OTP provider and mail integration

use async_trait::async_trait;

/// External phone OTP provider that generates, delivers and checks codes itself
#[async_trait]
pub trait OtpProviderTrait: Send + Sync {
    /// Ask the provider to text a fresh code to `phone`
    async fn send_code(&self, phone: &str) -> Result<(), String>;

    /// `true` when the provider approves `code` for `phone`
    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, String>;
}

/// Outbound mail carrying one-time codes
#[async_trait]
pub trait MailSenderTrait: Send + Sync {
    async fn send_email_verification(&self, email: &str, code: &str) -> Result<(), String>;

    async fn send_password_reset(&self, email: &str, code: &str) -> Result<(), String>;
}
