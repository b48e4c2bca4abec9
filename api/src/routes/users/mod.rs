//! Account self-service endpoints
//!
//! Phone and email verification, credential changes and the caller's own
//! identity live under `/api/users`; role management lives under
//! `/system/users`.

pub mod email;
pub mod password;
pub mod phone;
pub mod profile;
pub mod role;
