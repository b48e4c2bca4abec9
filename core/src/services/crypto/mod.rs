//! Password and one-time code hashing.
//!
//! bcrypt is CPU bound, so the async helpers run it on the blocking pool.

use std::sync::Arc;

use crate::errors::{DomainError, DomainResult};

/// One-way hashing of secrets with salted comparison
pub trait PasswordEncoderTrait: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String, String>;

    /// `false` for a mismatch and for a malformed hash
    fn matches(&self, raw: &str, hash: &str) -> bool;
}

/// bcrypt with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordEncoderTrait for BcryptPasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, String> {
        bcrypt::hash(raw, self.cost).map_err(|e| e.to_string())
    }

    fn matches(&self, raw: &str, hash: &str) -> bool {
        bcrypt::verify(raw, hash).unwrap_or(false)
    }
}

/// Hash `raw` off the async executor
pub async fn hash_secret<P>(encoder: &Arc<P>, raw: &str) -> DomainResult<String>
where
    P: PasswordEncoderTrait + ?Sized + 'static,
{
    let encoder = Arc::clone(encoder);
    let raw = raw.to_string();
    tokio::task::spawn_blocking(move || encoder.encode(&raw))
        .await
        .map_err(|e| DomainError::internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("hashing failed: {}", e)))
}

/// Compare `raw` against `hash` off the async executor
pub async fn secret_matches<P>(encoder: &Arc<P>, raw: &str, hash: &str) -> DomainResult<bool>
where
    P: PasswordEncoderTrait + ?Sized + 'static,
{
    let encoder = Arc::clone(encoder);
    let raw = raw.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || encoder.matches(&raw, &hash))
        .await
        .map_err(|e| DomainError::internal(format!("hash comparison task failed: {}", e)))
}
