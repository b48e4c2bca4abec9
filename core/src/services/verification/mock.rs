//! Mock OTP provider and mail sender for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{MailSenderTrait, OtpProviderTrait};

/// Provider that "sends" a fixed code and approves it until checked once
pub struct MockOtpProvider {
    pub code: String,
    pub sent: Arc<RwLock<Vec<String>>>,
    pending: Arc<RwLock<HashMap<String, String>>>,
    fail: AtomicBool,
}

impl MockOtpProvider {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            sent: Arc::new(RwLock::new(Vec::new())),
            pending: Arc::new(RwLock::new(HashMap::new())),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }
}

#[async_trait]
impl OtpProviderTrait for MockOtpProvider {
    async fn send_code(&self, phone: &str) -> Result<(), String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("provider error 60203".to_string());
        }
        self.sent.write().await.push(phone.to_string());
        self.pending
            .write()
            .await
            .insert(phone.to_string(), self.code.clone());
        Ok(())
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("provider error 20404".to_string());
        }
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

/// Kind of mail captured by [`MockMailSender`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    EmailVerification,
    PasswordReset,
}

/// Mail sender that records every message
pub struct MockMailSender {
    pub sent: Arc<RwLock<Vec<(MailKind, String, String)>>>,
    fail: AtomicBool,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Code of the most recent mail of `kind` sent to `email`
    pub async fn last_code(&self, kind: MailKind, email: &str) -> Option<String> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|(k, to, _)| *k == kind && to == email)
            .map(|(_, _, code)| code.clone())
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }

    async fn record(&self, kind: MailKind, email: &str, code: &str) -> Result<(), String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("smtp unavailable".to_string());
        }
        self.sent
            .write()
            .await
            .push((kind, email.to_string(), code.to_string()));
        Ok(())
    }
}

impl Default for MockMailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailSenderTrait for MockMailSender {
    async fn send_email_verification(&self, email: &str, code: &str) -> Result<(), String> {
        self.record(MailKind::EmailVerification, email, code).await
    }

    async fn send_password_reset(&self, email: &str, code: &str) -> Result<(), String> {
        self.record(MailKind::PasswordReset, email, code).await
    }
}
