//! Account-type routing

use std::sync::Arc;

use crate::domain::entities::AccountType;
use crate::repositories::AccountRepository;
use crate::services::cache::CacheServiceTrait;
use crate::services::crypto::PasswordEncoderTrait;

use super::service::AuthService;

/// Single decision point choosing the service for a request path
pub struct AuthGateway<A, C, P>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized,
{
    primary: Arc<AuthService<A, C, P>>,
    operator: Arc<AuthService<A, C, P>>,
}

impl<A, C, P> AuthGateway<A, C, P>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized + 'static,
{
    /// Pair the two services; each must serve the matching account type
    pub fn new(primary: Arc<AuthService<A, C, P>>, operator: Arc<AuthService<A, C, P>>) -> Self {
        debug_assert_eq!(primary.account_type(), AccountType::Primary);
        debug_assert_eq!(operator.account_type(), AccountType::Operator);
        Self { primary, operator }
    }

    pub fn for_type(&self, account_type: AccountType) -> &Arc<AuthService<A, C, P>> {
        match account_type {
            AccountType::Primary => &self.primary,
            AccountType::Operator => &self.operator,
        }
    }

    /// Service owning `path`, decided by path prefix
    pub fn for_path(&self, path: &str) -> &Arc<AuthService<A, C, P>> {
        self.for_type(AccountType::from_path(path))
    }
}

impl<A, C, P> Clone for AuthGateway<A, C, P>
where
    A: AccountRepository + ?Sized,
    C: CacheServiceTrait + ?Sized,
    P: PasswordEncoderTrait + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            primary: Arc::clone(&self.primary),
            operator: Arc::clone(&self.operator),
        }
    }
}
