//! MySQL repository implementations
//!
//! Both populations share the same schema shape in separate tables, so each
//! repository is constructed for one [`AccountType`] and resolves its table
//! names once.

pub mod account_repository_impl;
pub mod verification_token_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use verification_token_repository_impl::MySqlVerificationTokenRepository;

use idn_core::domain::entities::AccountType;
use idn_core::errors::DomainError;

/// Account table of a population
pub fn account_table(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Primary => "users",
        AccountType::Operator => "system_users",
    }
}

/// Verification token table of a population
pub fn verification_token_table(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Primary => "verification_token",
        AccountType::Operator => "system_verification_token",
    }
}

/// Whether a query failed on a unique index
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

/// Log a failed statement and hide its details from the domain
pub(crate) fn query_failed(operation: &str, table: &str, error: sqlx::Error) -> DomainError {
    tracing::error!(
        operation = operation,
        table = table,
        error = %error,
        "Database query failed"
    );
    DomainError::internal(format!("database {} on {} failed", operation, table))
}
