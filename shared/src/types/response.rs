//! Response envelopes returned by the HTTP layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generic error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error identifier for clients
    pub error: String,

    /// Localized message
    pub message: String,

    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Error body carrying per-field messages so clients can highlight the offending input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub message: String,
    pub fields: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl FieldErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.insert(field.into(), message.into());
        self
    }
}

/// Body returned on a rejected login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFailureResponse {
    pub timestamp: DateTime<Utc>,
    pub cause: String,
    pub app_error_code: u8,
}

impl AuthFailureResponse {
    pub fn new(cause: impl Into<String>, app_error_code: u8) -> Self {
        Self {
            timestamp: Utc::now(),
            cause: cause.into(),
            app_error_code,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub cache: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(
        service: impl Into<String>,
        version: impl Into<String>,
        database_up: bool,
        cache_up: bool,
    ) -> Self {
        let label = |up: bool| if up { "up" } else { "down" }.to_string();
        Self {
            status: if database_up && cache_up { "healthy" } else { "unhealthy" }.to_string(),
            service: service.into(),
            version: version.into(),
            database: label(database_up),
            cache: label(cache_up),
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
