//! Domain entities representing core business objects.

pub mod account;
pub mod cache_namespace;
pub mod password_reset;
pub mod token;
pub mod verification_token;

// Re-export commonly used types
pub use account::{Account, AccountType, OPERATOR_PATH_PREFIX, PRIMARY_PATH_PREFIX};
pub use cache_namespace::CacheNamespace;
pub use password_reset::PasswordResetGrant;
pub use token::{
    strip_bearer_prefix, AccessClaims, GrantedAuthority, RefreshClaims, TokenPair,
    AUTHORIZATION_HEADER, JWT_PREFIX, REFRESH_TOKEN_HEADER, ROLE_PREFIX,
};
pub use verification_token::{TokenPurpose, VerificationToken};

#[cfg(test)]
mod tests;
