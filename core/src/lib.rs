//! # idonow Core
//!
//! Core authentication domain for the idonow backend.
//! This crate contains domain entities, the token issuer, the session pin
//! store, one-time code verification, account flows, repository interfaces
//! and error types. Storage and transport live behind traits implemented in
//! the infrastructure crate.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{Account, AccountType, CacheNamespace, PasswordResetGrant, TokenPair, TokenPurpose};
pub use domain::value_objects::Principal;
pub use errors::{DomainError, DomainResult};
