//! Single-active-session enforcement.

mod service;


pub use service::{token_fingerprint, SessionPinStore};
