//! Phone one-time code providers
//!
//! The provider generates, delivers and checks the code itself; the core
//! phone verification service only adds a resend cooldown around it.

pub mod dev;
pub mod twilio_verify;

pub use dev::DevOtpProvider;
pub use twilio_verify::TwilioVerifyProvider;
