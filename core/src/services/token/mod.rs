//! Token issuer module for JWT management
//!
//! This module handles:
//! - Minting access and refresh token pairs
//! - Signature and expiry verification of presented tokens
//!
//! Whether a verified token is still the active one is decided by the
//! session pin store, never here.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenIssuerConfig;
pub use service::TokenIssuer;
