//! Mock implementation of VerificationTokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{TokenPurpose, VerificationToken};
use crate::errors::DomainError;

use super::r#trait::VerificationTokenRepository;

/// In-memory token store keyed by id
pub struct MockVerificationTokenRepository {
    tokens: Arc<RwLock<HashMap<i64, VerificationToken>>>,
    next_id: AtomicI64,
}

impl MockVerificationTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of rows currently stored
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Overwrite a stored row, e.g. to backdate `created_at`
    pub async fn put(&self, token: VerificationToken) {
        self.tokens.write().await.insert(token.id, token);
    }
}

impl Default for MockVerificationTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationTokenRepository for MockVerificationTokenRepository {
    async fn find(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.account_id == account_id && t.purpose == purpose)
            .cloned())
    }

    async fn insert(&self, mut token: VerificationToken) -> Result<VerificationToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens
            .values()
            .any(|t| t.account_id == token.account_id && t.purpose == token.purpose)
        {
            return Err(DomainError::Conflict {
                field: "token_type".to_string(),
            });
        }

        token.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn increment_attempts(&self, id: i64) -> Result<Option<i32>, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.get_mut(&id).map(|t| {
            t.attempt_number += 1;
            t.attempt_number
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.tokens.write().await.remove(&id).is_some())
    }

    async fn delete_by_account(&self, account_id: i64) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.account_id != account_id);
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_by_account_and_purpose(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !(t.account_id == account_id && t.purpose == purpose));
        Ok(tokens.len() < before)
    }

    async fn exists(&self, account_id: i64, purpose: TokenPurpose) -> Result<bool, DomainError> {
        Ok(self.find(account_id, purpose).await?.is_some())
    }
}
