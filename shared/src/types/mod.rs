//! Type definitions shared between layers
//!
//! - `language` - supported response languages
//! - `response` - error envelopes and health checks

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{AuthFailureResponse, ErrorResponse, FieldErrorResponse, HealthResponse};
