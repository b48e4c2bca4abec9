//! Shared utilities and common types for the idonow server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Response envelopes shared by the HTTP layer
//! - Phone number utilities for the application country

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, LimitsConfig, ServerConfig,
    TwilioConfig,
};
pub use types::{AuthFailureResponse, ErrorResponse, FieldErrorResponse, HealthResponse, Language};
pub use utils::phone;
