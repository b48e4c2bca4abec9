//! In-memory collaborators and request helpers shared by the endpoint tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test::TestRequest, web};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::RwLock;

use idn_api::{AppState, Collaborators, PopulationStores};
use idn_core::domain::entities::{Account, AccountType, TokenPurpose, VerificationToken};
use idn_core::repositories::{AccountRepository, VerificationTokenRepository};
use idn_core::services::{
    BcryptPasswordEncoder, CacheServiceTrait, DependencyHealthTrait, FixedClock, MailSenderTrait,
    OtpProviderTrait, PasswordEncoderTrait,
};
use idn_core::DomainError;
use idn_shared::AppConfig;

pub const PASSWORD: &str = "Secret-passw0rd";
pub const OTP: &str = "246810";

// --- cache ------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryCache {
    values: RwLock<HashMap<String, String>>,
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    failing: AtomicBool,
}

impl InMemoryCache {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn hash_len(&self, hash: &str) -> usize {
        self.hashes.read().await.get(hash).map(|h| h.len()).unwrap_or(0)
    }

    fn check(&self) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            Err("connection refused".to_string())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheServiceTrait for InMemoryCache {
    async fn set_with_expiry(&self, key: &str, value: &str, _ttl_seconds: u64) -> Result<(), String> {
        self.check()?;
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn get_and_delete(&self, key: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.values.write().await.remove(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, String> {
        self.check()?;
        let value = self.values.write().await.remove(key).is_some();
        let hash = self.hashes.write().await.remove(key).is_some();
        Ok(value || hash)
    }

    async fn hash_set(&self, hash: &str, field: &str, value: &str) -> Result<(), String> {
        self.check()?;
        self.hashes
            .write()
            .await
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.hashes.read().await.get(hash).and_then(|h| h.get(field).cloned()))
    }

    async fn hash_delete(&self, hash: &str, field: &str) -> Result<bool, String> {
        self.check()?;
        Ok(self
            .hashes
            .write()
            .await
            .get_mut(hash)
            .map(|h| h.remove(field).is_some())
            .unwrap_or(false))
    }
}

// --- verification tokens ----------------------------------------------------

#[derive(Default)]
pub struct InMemoryTokens {
    rows: RwLock<HashMap<i64, VerificationToken>>,
    next_id: AtomicI64,
}

impl InMemoryTokens {
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryTokens {
    async fn find(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|t| t.account_id == account_id && t.purpose == purpose)
            .cloned())
    }

    async fn insert(&self, token: VerificationToken) -> Result<VerificationToken, DomainError> {
        let mut rows = self.rows.write().await;
        if rows
            .values()
            .any(|t| t.account_id == token.account_id && t.purpose == token.purpose)
        {
            return Err(DomainError::Conflict {
                field: "token".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let token = VerificationToken { id, ..token };
        rows.insert(id, token.clone());
        Ok(token)
    }

    async fn increment_attempts(&self, id: i64) -> Result<Option<i32>, DomainError> {
        Ok(self.rows.write().await.get_mut(&id).map(|t| {
            t.attempt_number += 1;
            t.attempt_number
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn delete_by_account(&self, account_id: i64) -> Result<u64, DomainError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, t| t.account_id != account_id);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_account_and_purpose(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<bool, DomainError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, t| !(t.account_id == account_id && t.purpose == purpose));
        Ok(rows.len() < before)
    }

    async fn exists(&self, account_id: i64, purpose: TokenPurpose) -> Result<bool, DomainError> {
        Ok(self.find(account_id, purpose).await?.is_some())
    }
}

// --- accounts ---------------------------------------------------------------

pub struct InMemoryAccounts {
    rows: RwLock<HashMap<i64, Account>>,
    tokens: Arc<InMemoryTokens>,
}

impl InMemoryAccounts {
    pub fn new(tokens: Arc<InMemoryTokens>) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            tokens,
        }
    }

    pub async fn insert(&self, account: Account) {
        self.rows.write().await.insert(account.id, account);
    }

    pub async fn get(&self, id: i64) -> Option<Account> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn modify(&self, id: i64, change: impl FnOnce(&mut Account)) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let account = rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("account {}", id)))?;
        change(account);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<Account>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|a| a.phone_number == phone_number)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError> {
        Ok(self.get(id).await)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        self.modify(id, |a| a.set_password_hash(password_hash.to_string())).await
    }

    async fn set_phone_verified(&self, id: i64) -> Result<(), DomainError> {
        self.modify(id, |a| a.phone_verified = true).await
    }

    async fn set_email_verified(&self, id: i64) -> Result<(), DomainError> {
        self.modify(id, |a| a.email_verified = true).await
    }

    async fn update_role(&self, id: i64, role: &str) -> Result<(), DomainError> {
        self.modify(id, |a| a.role = role.to_string()).await
    }

    async fn update_email_and_purge_tokens(&self, account: &Account) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        if rows
            .values()
            .any(|a| a.id != account.id && a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(DomainError::Conflict {
                field: "email".to_string(),
            });
        }
        if !rows.contains_key(&account.id) {
            return Err(DomainError::not_found(format!("account {}", account.id)));
        }
        rows.insert(account.id, account.clone());
        drop(rows);

        self.tokens.delete_by_account(account.id).await?;
        Ok(())
    }
}

// --- providers --------------------------------------------------------------

/// Approves exactly one code for every number
pub struct FakeOtpProvider {
    code: String,
    sent_to: RwLock<Vec<String>>,
    failing: AtomicBool,
}

impl FakeOtpProvider {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            sent_to: RwLock::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent_count(&self) -> usize {
        self.sent_to.read().await.len()
    }
}

#[async_trait]
impl OtpProviderTrait for FakeOtpProvider {
    async fn send_code(&self, phone: &str) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("provider returned 503".to_string());
        }
        self.sent_to.write().await.push(phone.to_string());
        Ok(())
    }

    async fn check_code(&self, _phone: &str, code: &str) -> Result<bool, String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("provider returned 503".to_string());
        }
        Ok(code == self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    EmailVerification,
    PasswordReset,
}

#[derive(Default)]
pub struct RecordingMailSender {
    sent: RwLock<Vec<(MailKind, String, String)>>,
}

impl RecordingMailSender {
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
}

#[async_trait]
impl MailSenderTrait for RecordingMailSender {
    async fn send_email_verification(&self, email: &str, code: &str) -> Result<(), String> {
        self.sent
            .write()
            .await
            .push((MailKind::EmailVerification, email.to_string(), code.to_string()));
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, code: &str) -> Result<(), String> {
        self.sent
            .write()
            .await
            .push((MailKind::PasswordReset, email.to_string(), code.to_string()));
        Ok(())
    }
}

// --- health -----------------------------------------------------------------

/// Cache health follows the in-memory cache outage switch
pub struct StoreHealth {
    cache: Arc<InMemoryCache>,
    database_down: AtomicBool,
}

impl StoreHealth {
    pub fn set_database_down(&self, down: bool) {
        self.database_down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl DependencyHealthTrait for StoreHealth {
    async fn database_up(&self) -> bool {
        !self.database_down.load(Ordering::SeqCst)
    }

    async fn cache_up(&self) -> bool {
        self.cache.check().is_ok()
    }
}

// --- wiring -----------------------------------------------------------------

pub struct Population {
    pub accounts: Arc<InMemoryAccounts>,
    pub tokens: Arc<InMemoryTokens>,
}

impl Population {
    fn new() -> Self {
        let tokens = Arc::new(InMemoryTokens::default());
        Self {
            accounts: Arc::new(InMemoryAccounts::new(tokens.clone())),
            tokens,
        }
    }

    fn stores(&self) -> PopulationStores {
        PopulationStores {
            accounts: self.accounts.clone(),
            verification_tokens: self.tokens.clone(),
        }
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub primary: Population,
    pub operator: Population,
    pub cache: Arc<InMemoryCache>,
    pub otp: Arc<FakeOtpProvider>,
    pub mail: Arc<RecordingMailSender>,
    pub clock: Arc<FixedClock>,
    pub health: Arc<StoreHealth>,
    encoder: Arc<BcryptPasswordEncoder>,
}

impl TestContext {
    pub fn new() -> Self {
        let primary = Population::new();
        let operator = Population::new();
        let cache = Arc::new(InMemoryCache::default());
        let otp = Arc::new(FakeOtpProvider::new(OTP));
        let mail = Arc::new(RecordingMailSender::default());
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap()));
        let encoder = Arc::new(BcryptPasswordEncoder::new(4));
        let health = Arc::new(StoreHealth {
            cache: cache.clone(),
            database_down: AtomicBool::new(false),
        });

        let collaborators = Collaborators {
            primary: primary.stores(),
            operator: operator.stores(),
            cache: cache.clone(),
            otp: otp.clone(),
            mail: mail.clone(),
            encoder: encoder.clone(),
            clock: clock.clone(),
            health: health.clone(),
        };
        let state = AppState::assemble(collaborators, &AppConfig::default()).unwrap();

        Self {
            state: web::Data::new(state),
            primary,
            operator,
            cache,
            otp,
            mail,
            clock,
            health,
            encoder,
        }
    }

    pub fn population(&self, account_type: AccountType) -> &Population {
        match account_type {
            AccountType::Primary => &self.primary,
            AccountType::Operator => &self.operator,
        }
    }

    /// Store an active, fully verified account with [`PASSWORD`]
    pub async fn seed(&self, account_type: AccountType, id: i64, email: &str, phone: &str, role: &str) -> Account {
        let account = Account {
            id,
            email: email.to_lowercase(),
            phone_number: phone.to_string(),
            password_hash: self.encoder.encode(PASSWORD).unwrap(),
            role: role.to_string(),
            active: true,
            phone_verified: true,
            email_verified: true,
            password_updated_at: None,
            email_updated_at: None,
        };
        self.population(account_type).accounts.insert(account.clone()).await;
        account
    }

    /// Store a modified copy of an existing account
    pub async fn update(&self, account_type: AccountType, id: i64, change: impl FnOnce(&mut Account)) {
        let accounts = &self.population(account_type).accounts;
        let mut account = accounts.get(id).await.unwrap();
        change(&mut account);
        accounts.insert(account).await;
    }

    /// Move the clock forward by one second
    pub fn tick(&self) {
        self.clock.advance(Duration::seconds(1));
    }
}

pub fn header<B: MessageBody>(response: &ServiceResponse<B>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

pub fn login_request(uri: &str, username: &str, password: &str) -> TestRequest {
    TestRequest::post().uri(uri).set_json(serde_json::json!({
        "username": username,
        "password": password,
    }))
}

/// Request carrying `access` as its bearer credential
pub fn authorized(request: TestRequest, access: &str) -> TestRequest {
    request.insert_header(("Authorization", access.to_string()))
}
