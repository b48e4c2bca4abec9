//! Verification token repository trait defining one-time code persistence.

use async_trait::async_trait;

use crate::domain::entities::{TokenPurpose, VerificationToken};
use crate::errors::DomainError;

/// Store of one-time code rows for a single account population
///
/// Implementations must enforce at most one row per (account, purpose) and
/// make `increment_attempts` and `delete` atomic, so that two concurrent
/// checks can never both consume the same code.
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    async fn find(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError>;

    /// Insert a new token and return it with its assigned id
    ///
    /// Fails with `DomainError::Conflict` when a row for the same
    /// (account, purpose) already exists.
    async fn insert(&self, token: VerificationToken) -> Result<VerificationToken, DomainError>;

    /// Atomically increment the attempt counter and return the new value
    ///
    /// Returns `None` when the row no longer exists.
    async fn increment_attempts(&self, id: i64) -> Result<Option<i32>, DomainError>;

    /// Delete by id; `true` only for the call that actually removed the row
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Delete every token of an account and return how many were removed
    async fn delete_by_account(&self, account_id: i64) -> Result<u64, DomainError>;

    async fn delete_by_account_and_purpose(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<bool, DomainError>;

    async fn exists(&self, account_id: i64, purpose: TokenPurpose) -> Result<bool, DomainError>;
}
