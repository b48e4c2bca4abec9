//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Account and verification token repositories, one instance per account type

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::DatabasePool;
pub use mysql::{MySqlAccountRepository, MySqlVerificationTokenRepository};
