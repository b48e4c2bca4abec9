//! Localized client messages
//!
//! Messages are compiled in from `i18n/error_messages.toml` and looked up by
//! category and key, e.g. `("auth", "invalid-user-pwd")`.

use actix_web::{http::header, HttpRequest};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

pub use idn_shared::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorMessage {
    pub en: String,
    pub hy: String,
    pub code: String,
    pub http_status: u16,
}

impl ErrorMessage {
    pub fn text(&self, lang: Language) -> &str {
        match lang {
            Language::English => &self.en,
            Language::Armenian => &self.hy,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorMessages {
    #[serde(default)]
    pub auth: HashMap<String, ErrorMessage>,
    #[serde(default)]
    pub token: HashMap<String, ErrorMessage>,
    #[serde(default)]
    pub verification: HashMap<String, ErrorMessage>,
    #[serde(default)]
    pub validation: HashMap<String, ErrorMessage>,
    #[serde(default)]
    pub general: HashMap<String, ErrorMessage>,
}

pub static ERROR_MESSAGES: Lazy<ErrorMessages> = Lazy::new(|| {
    toml::from_str(include_str!("../../i18n/error_messages.toml")).unwrap_or_else(|e| {
        log::error!("Failed to parse error messages: {}", e);
        ErrorMessages::default()
    })
});

/// Language of the request from its `Accept-Language` header
pub fn request_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// `(code, text, http_status)` of a message
pub fn get_error_message(category: &str, key: &str, lang: Language) -> Option<(String, String, u16)> {
    let messages = &*ERROR_MESSAGES;

    let category_map = match category {
        "auth" => &messages.auth,
        "token" => &messages.token,
        "verification" => &messages.verification,
        "validation" => &messages.validation,
        "general" => &messages.general,
        _ => return None,
    };

    category_map
        .get(key)
        .map(|msg| (msg.code.clone(), msg.text(lang).to_string(), msg.http_status))
}

/// Localized text, or `category.key` when the message is missing
pub fn message(category: &str, key: &str, lang: Language) -> String {
    get_error_message(category, key, lang)
        .map(|(_, text, _)| text)
        .unwrap_or_else(|| format!("{}.{}", category, key))
}

pub fn format_message(template: &str, params: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        let placeholder = format!("{{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
