//! Outbound mail
//!
//! Mail transport is provided by the deployment; this crate ships a sender
//! that records each message in the log, used until a transport is wired.

mod log_sender;

pub use log_sender::LogMailSender;
