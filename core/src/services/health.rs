//! Reachability of the stores behind the services

use async_trait::async_trait;

/// Liveness of the relational store and the shared cache
#[async_trait]
pub trait DependencyHealthTrait: Send + Sync {
    async fn database_up(&self) -> bool;

    async fn cache_up(&self) -> bool;
}
