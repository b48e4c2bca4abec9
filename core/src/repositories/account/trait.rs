//! Account repository trait: the credential store for one account population.

use async_trait::async_trait;

use crate::domain::entities::Account;
use crate::errors::DomainError;

/// Persistence operations over the accounts of a single [`AccountType`]
///
/// Two implementations are wired at startup, one per account table, so the
/// methods never take an account type.
///
/// [`AccountType`]: crate::domain::entities::AccountType
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by email, ignoring case
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by its normalized phone number
    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<Account>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError>;

    /// Whether any account already uses `email`, ignoring case
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DomainError>;

    async fn set_phone_verified(&self, id: i64) -> Result<(), DomainError>;

    async fn set_email_verified(&self, id: i64) -> Result<(), DomainError>;

    async fn update_role(&self, id: i64, role: &str) -> Result<(), DomainError>;

    /// Persist a changed email and purge every verification token of the account
    ///
    /// Both writes happen in one transaction: either the account carries the
    /// new email with no tokens left, or nothing changed.
    async fn update_email_and_purge_tokens(&self, account: &Account) -> Result<(), DomainError>;
}
