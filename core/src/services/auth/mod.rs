//! Authentication service module
//!
//! This module provides:
//! - Credential login by email or phone number
//! - Per-request bearer token authentication against the session pin
//! - Token refresh and logout
//! - Account-type routing through [`AuthGateway`]

mod audit;
mod config;
mod gateway;
mod service;

#[cfg(test)]
mod tests;

pub use audit::{AuditSink, AuthEvent, AuthEventKind, TracingAuditSink};
pub use config::AuthServiceConfig;
pub use gateway::AuthGateway;
pub use service::AuthService;
