use async_trait::async_trait;
use tracing::info;

use idn_core::services::MailSenderTrait;

/// Mail sender that logs messages instead of delivering them
#[derive(Debug, Default, Clone)]
pub struct LogMailSender;

impl LogMailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailSenderTrait for LogMailSender {
    async fn send_email_verification(&self, email: &str, code: &str) -> Result<(), String> {
        info!(
            target: "mail",
            to = %mask_email(email),
            code = %code,
            "Email verification message"
        );
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, code: &str) -> Result<(), String> {
        info!(
            target: "mail",
            to = %mask_email(email),
            code = %code,
            "Password reset message"
        );
        Ok(())
    }
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}
