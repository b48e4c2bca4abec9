//! In-memory cache for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::CacheServiceTrait;

/// Cache backed by two maps; TTLs are recorded but never enforced
pub struct MockCacheService {
    pub values: Arc<RwLock<HashMap<String, (String, u64)>>>,
    pub hashes: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
    fail: AtomicBool,
}

impl MockCacheService {
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            hashes: Arc::new(RwLock::new(HashMap::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the cache were unreachable
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub async fn ttl_of(&self, key: &str) -> Option<u64> {
        self.values.read().await.get(key).map(|(_, ttl)| *ttl)
    }

    fn check(&self) -> Result<(), String> {
        if self.fail.load(Ordering::SeqCst) {
            Err("connection refused".to_string())
        } else {
            Ok(())
        }
    }
}

impl Default for MockCacheService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheServiceTrait for MockCacheService {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        self.check()?;
        self.values
            .write()
            .await
            .insert(key.to_string(), (value.to_string(), ttl_seconds));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.values.read().await.get(key).map(|(v, _)| v.clone()))
    }

    async fn get_and_delete(&self, key: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.values.write().await.remove(key).map(|(v, _)| v))
    }

    async fn delete(&self, key: &str) -> Result<bool, String> {
        self.check()?;
        let removed_value = self.values.write().await.remove(key).is_some();
        let removed_hash = self.hashes.write().await.remove(key).is_some();
        Ok(removed_value || removed_hash)
    }

    async fn hash_set(&self, hash: &str, field: &str, value: &str) -> Result<(), String> {
        self.check()?;
        self.hashes
            .write()
            .await
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self
            .hashes
            .read()
            .await
            .get(hash)
            .and_then(|h| h.get(field).cloned()))
    }

    async fn hash_delete(&self, hash: &str, field: &str) -> Result<bool, String> {
        self.check()?;
        Ok(self
            .hashes
            .write()
            .await
            .get_mut(hash)
            .map(|h| h.remove(field).is_some())
            .unwrap_or(false))
    }
}
