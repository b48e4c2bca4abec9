//! Session pin store over the shared cache

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};

use crate::domain::entities::{AccountType, CacheNamespace, TokenPair};
use crate::errors::{DomainError, DomainResult};
use crate::services::cache::CacheServiceTrait;

/// Records the one authoritative token pair per subject
///
/// One instance exists per account type. Pins live in two cache hashes named
/// after the account type's namespaces, keyed by subject. Overwrites are
/// last-writer-wins.
pub struct SessionPinStore<C: CacheServiceTrait + ?Sized> {
    cache: Arc<C>,
    account_type: AccountType,
}

impl<C: CacheServiceTrait + ?Sized> SessionPinStore<C> {
    pub fn new(cache: Arc<C>, account_type: AccountType) -> Self {
        Self { cache, account_type }
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Overwrite the pinned pair for `subject`
    pub async fn pin(&self, subject: &str, pair: &TokenPair) -> DomainResult<()> {
        let subject = subject.to_lowercase();
        self.cache
            .hash_set(
                self.account_type.access_token_namespace().as_str(),
                &subject,
                &pair.access_token,
            )
            .await
            .map_err(|e| self.cache_error("pin", e))?;
        self.cache
            .hash_set(
                self.account_type.refresh_token_namespace().as_str(),
                &subject,
                &pair.refresh_token,
            )
            .await
            .map_err(|e| self.cache_error("pin", e))?;

        tracing::debug!(
            account_type = %self.account_type,
            subject = %subject,
            access = %token_fingerprint(&pair.access_token),
            event = "session_pinned",
            "Pinned new session"
        );
        Ok(())
    }

    /// `true` when no access pin exists or it differs from `presented`
    pub async fn is_access_token_stale(&self, subject: &str, presented: &str) -> DomainResult<bool> {
        self.is_stale(self.account_type.access_token_namespace(), subject, presented)
            .await
    }

    /// `true` when no refresh pin exists or it differs from `presented`
    pub async fn is_refresh_token_stale(&self, subject: &str, presented: &str) -> DomainResult<bool> {
        self.is_stale(self.account_type.refresh_token_namespace(), subject, presented)
            .await
    }

    /// Remove both pins; a second call is a no-op
    pub async fn interrupt(&self, subject: &str) -> DomainResult<()> {
        let subject = subject.to_lowercase();
        let mut removed = false;
        for namespace in [
            self.account_type.access_token_namespace(),
            self.account_type.refresh_token_namespace(),
        ] {
            removed |= self
                .cache
                .hash_delete(namespace.as_str(), &subject)
                .await
                .map_err(|e| self.cache_error("interrupt", e))?;
        }

        tracing::info!(
            account_type = %self.account_type,
            subject = %subject,
            removed = removed,
            event = "session_interrupted",
            "Session interrupted"
        );
        Ok(())
    }

    /// Drop every pin of both account types
    ///
    /// Run once at startup so no session survives a restart.
    pub async fn evict_all(cache: &C) -> DomainResult<()> {
        for namespace in CacheNamespace::PINS {
            cache
                .delete(namespace.as_str())
                .await
                .map_err(|e| DomainError::internal(format!("failed to evict {}: {}", namespace, e)))?;
        }
        tracing::info!(event = "session_pins_evicted", "Cleared all session pins");
        Ok(())
    }

    async fn is_stale(
        &self,
        namespace: CacheNamespace,
        subject: &str,
        presented: &str,
    ) -> DomainResult<bool> {
        let pinned = self
            .cache
            .hash_get(namespace.as_str(), &subject.to_lowercase())
            .await
            .map_err(|e| self.cache_error("pin lookup", e))?;

        Ok(match pinned {
            Some(pinned) => !constant_time_eq(pinned.as_bytes(), presented.as_bytes()),
            None => true,
        })
    }

    fn cache_error(&self, operation: &str, error: String) -> DomainError {
        tracing::error!(
            account_type = %self.account_type,
            operation = operation,
            error = %error,
            event = "session_cache_failure",
            "Session pin store unavailable"
        );
        DomainError::internal(format!("session {} failed", operation))
    }
}

/// Short, non-reversible token identifier for logs
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}
