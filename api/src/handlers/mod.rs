pub mod error;

pub use error::{domain_error, handle_domain_error_with_lang, handle_validation_errors, json_error_handler};
