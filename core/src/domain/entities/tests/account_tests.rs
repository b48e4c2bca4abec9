//! Unit tests for account entities and namespaces

use crate::domain::entities::{Account, AccountType, CacheNamespace};

fn account() -> Account {
    Account {
        id: 7,
        email: "Person@Example.com".to_string(),
        phone_number: "+37477123456".to_string(),
        password_hash: "hash".to_string(),
        role: "USER".to_string(),
        active: true,
        phone_verified: true,
        email_verified: true,
        password_updated_at: None,
        email_updated_at: None,
    }
}

#[test]
fn test_account_type_from_path() {
    assert_eq!(AccountType::from_path("/api/login"), AccountType::Primary);
    assert_eq!(AccountType::from_path("/api"), AccountType::Primary);
    assert_eq!(AccountType::from_path("/system/login"), AccountType::Operator);
    assert_eq!(AccountType::from_path("/health"), AccountType::Operator);
}

#[test]
fn test_namespaces_never_shared_between_types() {
    let primary = AccountType::Primary;
    let operator = AccountType::Operator;
    assert_ne!(primary.access_token_namespace(), operator.access_token_namespace());
    assert_ne!(primary.refresh_token_namespace(), operator.refresh_token_namespace());
    assert_ne!(primary.password_reset_namespace(), operator.password_reset_namespace());
    assert_ne!(primary.access_token_namespace(), primary.refresh_token_namespace());
}

#[test]
fn test_cache_namespace_list_is_complete() {
    assert_eq!(CacheNamespace::ALL.len(), 7);
    for ns in CacheNamespace::PINS {
        assert!(!ns.is_prefix());
    }
    assert_eq!(CacheNamespace::AppUserPasswordReset.key(42), "appUserPasswordReset:42");
    assert_eq!(
        CacheNamespace::PhoneVerificationInfo.key("+37477123456"),
        "verificationInfo:+37477123456"
    );
}

#[test]
fn test_authorities_and_subject() {
    let account = account();
    assert_eq!(account.authorities(), vec!["ROLE_USER".to_string()]);
    assert_eq!(account.subject(), "person@example.com");
}

#[test]
fn test_change_email_resets_verification() {
    let mut account = account();
    account.change_email("New@Example.com");
    assert_eq!(account.email, "new@example.com");
    assert!(!account.email_verified);
    assert!(account.email_updated_at.is_some());
}

#[test]
fn test_operator_skips_phone_verification_requirement() {
    assert!(AccountType::Primary.requires_phone_verification());
    assert!(!AccountType::Operator.requires_phone_verification());
}
