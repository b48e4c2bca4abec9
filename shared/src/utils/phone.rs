//! Phone number utilities
//!
//! Numbers are accepted in the local formats used in the application country
//! and stored in a single normalized form (`+374XXXXXXXX`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// Countries with a known numbering plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryCode {
    AM,
}

impl CountryCode {
    /// International dialing prefix
    pub fn dialing_prefix(&self) -> &'static str {
        match self {
            CountryCode::AM => "+374",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            CountryCode::AM => &ARMENIAN_PHONE_REGEX,
        }
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AM" => Ok(CountryCode::AM),
            other => Err(format!("Unsupported country code: {}", other)),
        }
    }
}

// Optional +374 or trunk 0, two-digit area code (optionally parenthesized),
// then three pairs separated by optional spaces or dashes
static ARMENIAN_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+374|0)?\s?(\d{2}|\(\d{2}\))[-\s]?(\d{2})[-\s]?(\d{2})[-\s]?(\d{2})$").unwrap()
});

/// Check that a raw number matches the numbering plan of `country`
pub fn is_valid_phone(raw: &str, country: CountryCode) -> bool {
    country.pattern().is_match(raw.trim())
}

/// Normalize a raw number to `<prefix><area><subscriber>`; `None` when it does not validate
pub fn normalize_phone_number(raw: &str, country: CountryCode) -> Option<String> {
    let caps = country.pattern().captures(raw.trim())?;
    let mut normalized = String::from(country.dialing_prefix());
    for i in 2..caps.len() {
        let group = caps.get(i)?.as_str();
        normalized.push_str(group.trim_start_matches('(').trim_end_matches(')'));
    }
    Some(normalized)
}

/// Hide every character except the last three for logging
pub fn mask_phone_number(phone: &str) -> String {
    let visible = 3;
    let count = phone.chars().count();
    if count <= visible {
        return "*".repeat(count);
    }
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < count - visible { '*' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_formats() {
        let am = CountryCode::AM;
        assert_eq!(normalize_phone_number("077123456", am).as_deref(), Some("+37477123456"));
        assert_eq!(normalize_phone_number("+374 77 12 34 56", am).as_deref(), Some("+37477123456"));
        assert_eq!(normalize_phone_number("(77) 12-34-56", am).as_deref(), Some("+37477123456"));
        assert_eq!(normalize_phone_number("77123456", am).as_deref(), Some("+37477123456"));
    }

    #[test]
    fn test_rejects_foreign_and_short_numbers() {
        let am = CountryCode::AM;
        assert!(!is_valid_phone("+8613812345678", am));
        assert!(!is_valid_phone("7712345", am));
        assert!(normalize_phone_number("hello", am).is_none());
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+37477123456"), "*********456");
        assert_eq!(mask_phone_number("12"), "**");
    }

    #[test]
    fn test_country_code_from_str() {
        assert_eq!("am".parse::<CountryCode>(), Ok(CountryCode::AM));
        assert!("US".parse::<CountryCode>().is_err());
    }
}
