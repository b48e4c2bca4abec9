//! One-time code verification
//!
//! This module provides:
//! - Issuing and checking hashed six-digit codes with bounded attempts
//! - Expiry and resend cooldown for stored codes
//! - Cooldown-guarded wrapping of an external phone OTP provider

mod code;
mod config;
mod phone;
mod service;
mod traits;
mod types;

#[cfg(test)]
pub mod mock;

pub use code::{generate_code, is_well_formed_code, CODE_LENGTH};
pub use config::VerificationServiceConfig;
pub use phone::PhoneVerificationService;
pub use service::VerificationService;
pub use traits::{MailSenderTrait, OtpProviderTrait};
pub use types::IssuedCode;
