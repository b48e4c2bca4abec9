//! Structured authentication events

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::AccountType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    LoginSucceeded,
    LoginFailed,
    TokenRefreshed,
    LoggedOut,
}

/// One audit record
#[derive(Debug, Clone, Serialize)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub account_type: AccountType,
    /// Lowercased email, or the submitted username for failed logins
    pub subject: String,
    /// Request path that triggered the event
    pub path: String,
    /// Failure cause, if any
    pub cause: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuthEvent {
    pub fn new(kind: AuthEventKind, account_type: AccountType, subject: &str, path: &str) -> Self {
        Self {
            kind,
            account_type,
            subject: subject.to_string(),
            path: path.to_string(),
            cause: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Destination for audit events
///
/// Recording is fire-and-forget; implementations must not block or fail the
/// flow that emits the event.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuthEvent);
}

/// Writes events as `tracing` records on the `audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuthEvent) {
        match event.kind {
            AuthEventKind::LoginFailed => tracing::warn!(
                target: "audit",
                kind = ?event.kind,
                account_type = %event.account_type,
                subject = %event.subject,
                path = %event.path,
                cause = event.cause.as_deref().unwrap_or(""),
                "auth event"
            ),
            _ => tracing::info!(
                target: "audit",
                kind = ?event.kind,
                account_type = %event.account_type,
                subject = %event.subject,
                path = %event.path,
                "auth event"
            ),
        }
    }
}
