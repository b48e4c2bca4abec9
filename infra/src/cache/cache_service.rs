//! `CacheServiceTrait` over Redis

use async_trait::async_trait;

use idn_core::services::CacheServiceTrait;

use super::redis_client::RedisClient;

/// Cache used by session pins, phone verification markers and reset grants
///
/// Errors are flattened to strings at this boundary; the Redis client has
/// already logged the details.
#[derive(Clone)]
pub struct RedisCacheService {
    client: RedisClient,
}

impl RedisCacheService {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

#[async_trait]
impl CacheServiceTrait for RedisCacheService {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        self.client
            .set_with_expiry(key, value, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.client.get(key).await.map_err(|e| e.to_string())
    }

    async fn get_and_delete(&self, key: &str) -> Result<Option<String>, String> {
        self.client.get_and_delete(key).await.map_err(|e| e.to_string())
    }

    async fn delete(&self, key: &str) -> Result<bool, String> {
        self.client.delete(key).await.map_err(|e| e.to_string())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), String> {
        self.client
            .hash_set(key, field, value)
            .await
            .map_err(|e| e.to_string())
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, String> {
        self.client.hash_get(key, field).await.map_err(|e| e.to_string())
    }

    async fn hash_delete(&self, key: &str, field: &str) -> Result<bool, String> {
        self.client
            .hash_delete(key, field)
            .await
            .map_err(|e| e.to_string())
    }
}
