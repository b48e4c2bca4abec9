//! Phone OTP wrapper with a local resend cooldown

use std::sync::Arc;

use chrono::{DateTime, Utc};
use idn_shared::phone::mask_phone_number;

use crate::domain::entities::CacheNamespace;
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::services::cache::CacheServiceTrait;
use crate::services::clock::{Clock, SystemClock};

use super::config::VerificationServiceConfig;
use super::traits::OtpProviderTrait;

/// Guards an external OTP provider with a per-phone cooldown marker
///
/// The provider owns code generation and delivery state. Locally only the
/// time of the last send is kept, under `verificationInfo:<phone>`.
pub struct PhoneVerificationService<C, O>
where
    C: CacheServiceTrait + ?Sized,
    O: OtpProviderTrait + ?Sized,
{
    cache: Arc<C>,
    provider: Arc<O>,
    config: VerificationServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<C, O> PhoneVerificationService<C, O>
where
    C: CacheServiceTrait + ?Sized,
    O: OtpProviderTrait + ?Sized,
{
    pub fn new(cache: Arc<C>, provider: Arc<O>, config: VerificationServiceConfig) -> Self {
        Self::with_clock(cache, provider, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        cache: Arc<C>,
        provider: Arc<O>,
        config: VerificationServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            provider,
            config,
            clock,
        }
    }

    /// Ask the provider to send a code to a normalized phone number
    ///
    /// Returns `Ok(false)` when the provider rejects the request and
    /// `ResendNotAllowed` inside the cooldown.
    pub async fn start_verification(&self, phone: &str) -> DomainResult<bool> {
        let key = CacheNamespace::PhoneVerificationInfo.key(phone);
        let now = self.clock.now();

        if let Some(last_sent) = self.last_sent(&key).await? {
            let resend_at = last_sent + self.config.resend_cooldown();
            if now <= resend_at {
                let retry_after_seconds = (resend_at - now).num_seconds().max(1);
                tracing::info!(
                    phone = %mask_phone_number(phone),
                    retry_after_seconds = retry_after_seconds,
                    event = "phone_code_throttled",
                    "Phone code requested inside resend cooldown"
                );
                return Err(VerificationError::ResendNotAllowed { retry_after_seconds }.into());
            }
        }

        if let Err(e) = self.provider.send_code(phone).await {
            tracing::warn!(
                phone = %mask_phone_number(phone),
                error = %e,
                event = "phone_code_send_failed",
                "OTP provider rejected send request"
            );
            return Ok(false);
        }

        self.cache
            .set_with_expiry(
                &key,
                &now.to_rfc3339(),
                self.config.phone_verification_info_minutes * 60,
            )
            .await
            .map_err(|e| cache_error("store phone cooldown", e))?;

        tracing::info!(
            phone = %mask_phone_number(phone),
            event = "phone_code_sent",
            "Phone verification started"
        );
        Ok(true)
    }

    /// Check a code with the provider
    ///
    /// An approved code clears the cooldown marker. Provider failures surface
    /// as `ActionNotAllowed` without provider detail.
    pub async fn confirm_verification(&self, phone: &str, code: &str) -> DomainResult<bool> {
        let approved = self.provider.check_code(phone, code).await.map_err(|e| {
            tracing::warn!(
                phone = %mask_phone_number(phone),
                error = %e,
                event = "phone_code_check_failed",
                "OTP provider check failed"
            );
            VerificationError::not_allowed("phone verification check failed")
        })?;

        if !approved {
            tracing::info!(
                phone = %mask_phone_number(phone),
                event = "phone_code_mismatch",
                "Phone code not approved"
            );
            return Ok(false);
        }

        let key = CacheNamespace::PhoneVerificationInfo.key(phone);
        self.cache
            .delete(&key)
            .await
            .map_err(|e| cache_error("clear phone cooldown", e))?;

        tracing::info!(
            phone = %mask_phone_number(phone),
            event = "phone_code_verified",
            "Phone verification approved"
        );
        Ok(true)
    }

    async fn last_sent(&self, key: &str) -> DomainResult<Option<DateTime<Utc>>> {
        let value = self
            .cache
            .get(key)
            .await
            .map_err(|e| cache_error("read phone cooldown", e))?;

        // An unreadable marker is treated as absent
        Ok(value
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|t| t.with_timezone(&Utc)))
    }
}

fn cache_error(operation: &str, error: String) -> DomainError {
    tracing::error!(
        operation = operation,
        error = %error,
        event = "phone_cache_failure",
        "Cache unavailable during phone verification"
    );
    DomainError::internal(format!("{} failed", operation))
}
