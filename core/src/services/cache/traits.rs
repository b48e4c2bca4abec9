//! Trait for cache service integration

use async_trait::async_trait;

/// Key/value and hash operations over the shared cache
///
/// Errors are returned as provider messages; callers log them and translate
/// them into domain errors.
#[async_trait]
pub trait CacheServiceTrait: Send + Sync {
    /// Store a value that expires after `ttl_seconds`
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String>;

    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Atomically read and remove a value
    async fn get_and_delete(&self, key: &str) -> Result<Option<String>, String>;

    /// Remove a key; `true` when something was removed
    async fn delete(&self, key: &str) -> Result<bool, String>;

    /// Overwrite one field of a hash
    async fn hash_set(&self, hash: &str, field: &str, value: &str) -> Result<(), String>;

    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<String>, String>;

    /// Remove one field of a hash; `true` when something was removed
    async fn hash_delete(&self, hash: &str, field: &str) -> Result<bool, String>;
}
