//! Redis cache client implementation
//!
//! A multiplexed async connection with retry logic and the handful of
//! commands the auth stack needs: plain keys with expiry for grants and phone
//! verification markers, and hash fields for session pins.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use idn_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the exponential backoff between attempts
const MAX_BACKOFF_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with connection retry and per-command retry
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    max_retries: u32,
    /// Base delay between retries, doubled per attempt
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the retry settings carried by `config`
    ///
    /// # Returns
    /// * `Ok(RedisClient)` - Connected client
    /// * `Err(InfrastructureError::Config)` - URL could not be parsed
    /// * `Err(InfrastructureError::Cache)` - Server unreachable after all attempts
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            "Creating Redis client with URL: {} (max_retries: {})",
            mask_url(&config.url),
            config.max_retries
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let max_retries = config.max_retries.max(1);
        let connection = Self::create_connection_with_retry(
            client,
            max_retries,
            config.retry_delay_ms,
            Duration::from_secs(config.connection_timeout),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome =
                tokio::time::timeout(connect_timeout, client.get_multiplexed_async_connection())
                    .await;

            let error = match outcome {
                Ok(Ok(connection)) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Ok(Err(e)) => InfrastructureError::Cache(e),
                Err(_) => InfrastructureError::General(format!(
                    "Redis connection timed out after {}s",
                    connect_timeout.as_secs()
                )),
            };

            if attempts >= max_retries {
                error!(
                    "Failed to connect to Redis after {} attempts: {}",
                    attempts, error
                );
                return Err(error);
            }

            warn!(
                "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                attempts, max_retries, error, delay
            );
            sleep(Duration::from_millis(delay)).await;
            delay = (delay * 2).min(MAX_BACKOFF_MS);
        }
    }

    /// `SET key value EX expiry_seconds`
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();

            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Read and remove a key in one `GETDEL`
    ///
    /// Of two concurrent callers only one can observe the value.
    pub async fn get_and_delete(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Consuming key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move {
                redis::cmd("GETDEL")
                    .arg(key)
                    .query_async::<_, Option<String>>(&mut conn)
                    .await
            })
        })
        .await
        .map_err(|e| {
            error!("Failed to consume key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key of any type; `true` if it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        let deleted_count = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();

                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to delete key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted_count > 0)
    }

    /// `HSET key field value`
    pub async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), InfrastructureError> {
        debug!("Setting field in hash '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let field = field.to_string();
            let value = value.to_string();

            Box::pin(async move { conn.hset::<_, _, _, ()>(key, field, value).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set field in hash '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    pub async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let field = field.to_string();

            Box::pin(async move { conn.hget::<_, _, Option<String>>(key, field).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to read field of hash '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// `HDEL key field`; `true` if the field existed
    pub async fn hash_delete(&self, key: &str, field: &str) -> Result<bool, InfrastructureError> {
        let removed = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                let field = field.to_string();

                Box::pin(async move { conn.hdel::<_, _, u32>(key, field).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to delete field of hash '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(removed > 0)
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Run `operation`, retrying transient failures with exponential backoff
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether a Redis error is transient and worth another attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
