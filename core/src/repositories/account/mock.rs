//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::Account;
use crate::errors::DomainError;
use crate::repositories::verification_token::VerificationTokenRepository;

use super::r#trait::AccountRepository;

/// In-memory account store keyed by id
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
    tokens: Option<Arc<dyn VerificationTokenRepository>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            tokens: None,
        }
    }

    /// Link a token store so email updates purge tokens like the real transaction
    pub fn with_tokens(mut self, tokens: Arc<dyn VerificationTokenRepository>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub async fn insert(&self, account: Account) {
        self.accounts.write().await.insert(account.id, account);
    }

    pub async fn get(&self, id: i64) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }

    async fn modify<F>(&self, id: i64, f: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Account) + Send,
    {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("account {}", id)))?;
        f(account);
        Ok(())
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
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
        let hash = password_hash.to_string();
        self.modify(id, move |a| a.set_password_hash(hash)).await
    }

    async fn set_phone_verified(&self, id: i64) -> Result<(), DomainError> {
        self.modify(id, |a| a.phone_verified = true).await
    }

    async fn set_email_verified(&self, id: i64) -> Result<(), DomainError> {
        self.modify(id, |a| a.email_verified = true).await
    }

    async fn update_role(&self, id: i64, role: &str) -> Result<(), DomainError> {
        let role = role.to_string();
        self.modify(id, move |a| a.role = role).await
    }

    async fn update_email_and_purge_tokens(&self, account: &Account) -> Result<(), DomainError> {
        if let Some(tokens) = &self.tokens {
            tokens.delete_by_account(account.id).await?;
        }
        self.accounts
            .write()
            .await
            .insert(account.id, account.clone());
        Ok(())
    }
}
