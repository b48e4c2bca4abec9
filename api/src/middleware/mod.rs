pub mod auth;

pub use auth::{Authenticated, JwtAuth, StaleSession};
