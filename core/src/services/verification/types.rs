//! Types for verification service results

use chrono::{DateTime, Utc};

/// A freshly stored one-time code
///
/// `code` is the only plaintext copy; the caller delivers it out of band and
/// discards the stored token if delivery fails.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub token_id: i64,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
