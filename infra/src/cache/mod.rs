//! Redis-backed cache
//!
//! `RedisClient` owns the connection and retry policy; `RedisCacheService`
//! adapts it to the core `CacheServiceTrait`.

pub mod cache_service;
pub mod redis_client;


pub use cache_service::RedisCacheService;
pub use redis_client::RedisClient;
