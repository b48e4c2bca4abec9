//! Development OTP provider
//!
//! Generates codes locally and writes them to the log instead of sending an
//! SMS. Never selected in production.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use idn_core::services::verification::generate_code;
use idn_core::services::OtpProviderTrait;
use idn_shared::phone::mask_phone_number;

#[derive(Default)]
pub struct DevOtpProvider {
    pending: RwLock<HashMap<String, String>>,
}

impl DevOtpProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpProviderTrait for DevOtpProvider {
    async fn send_code(&self, phone: &str) -> Result<(), String> {
        let code = generate_code();
        info!(
            phone = %mask_phone_number(phone),
            code = %code,
            "Development OTP provider: code not sent, logged only"
        );
        self.pending.write().await.insert(phone.to_string(), code);
        Ok(())
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, String> {
        let mut pending = self.pending.write().await;
        match pending.get(phone) {
            Some(expected) if expected == code => {
                pending.remove(phone);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
