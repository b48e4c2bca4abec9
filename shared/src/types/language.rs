//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language preference for localized messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hy")]
    Armenian,
}

impl Language {
    /// Pick the highest-weighted supported language from an `Accept-Language` value.
    ///
    /// Entries without an explicit `q` weigh 1.0; unsupported languages are skipped
    /// and English is returned when nothing matches.
    pub fn from_accept_language(header: &str) -> Self {
        let mut preferred = Language::English;
        let mut best = 0.0_f32;

        for entry in header.split(',') {
            let mut parts = entry.trim().split(';');
            let tag = parts.next().unwrap_or_default().trim().to_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let candidate = if tag.starts_with("hy") {
                Some(Language::Armenian)
            } else if tag.starts_with("en") {
                Some(Language::English)
            } else {
                None
            };

            if let Some(lang) = candidate {
                if quality > best {
                    preferred = lang;
                    best = quality;
                }
            }
        }

        preferred
    }

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Armenian => "hy",
        }
    }
}
