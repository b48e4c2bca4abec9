//! Unit tests for the token issuer

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use idn_shared::JwtConfig;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::domain::entities::token::RefreshClaims;
use crate::errors::{DomainError, TokenError};
use crate::services::clock::FixedClock;
use crate::services::token::{TokenIssuer, TokenIssuerConfig};

fn create_config() -> TokenIssuerConfig {
    TokenIssuerConfig::from_jwt_config(&JwtConfig::default()).unwrap()
}

fn create_issuer() -> (TokenIssuer, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
    (TokenIssuer::with_clock(create_config(), clock.clone()), clock)
}

#[test]
fn test_mint_then_verify_access() {
    let (issuer, _) = create_issuer();
    let pair = issuer
        .mint("A@B.com", &["ROLE_USER".to_string()], "/api/login")
        .unwrap();

    let claims = issuer.verify_access(&pair.access_token).unwrap();
    assert_eq!(claims.sub, "a@b.com");
    assert_eq!(claims.authority_names(), vec!["ROLE_USER".to_string()]);
    assert_eq!(claims.iss, "/api/login");
    assert_eq!(claims.exp - claims.iat, 30 * 60);
}

#[test]
fn test_mint_then_verify_refresh() {
    let (issuer, _) = create_issuer();
    let pair = issuer.mint("ops@idonow.net", &[], "/system/login").unwrap();

    assert_eq!(issuer.verify_refresh(&pair.refresh_token).unwrap(), "ops@idonow.net");
}

#[test]
fn test_pairs_minted_in_same_second_differ() {
    let (issuer, _) = create_issuer();
    let first = issuer.mint("a@b.com", &["ROLE_USER".to_string()], "/api/login").unwrap();
    let second = issuer.mint("a@b.com", &["ROLE_USER".to_string()], "/api/login").unwrap();

    assert_ne!(first.access_token, second.access_token);
    assert_ne!(first.refresh_token, second.refresh_token);
    assert_ne!(
        issuer.verify_access(&first.access_token).unwrap().jti,
        issuer.verify_access(&second.access_token).unwrap().jti
    );
}

#[test]
fn test_access_and_refresh_keys_are_not_interchangeable() {
    let (issuer, _) = create_issuer();
    let pair = issuer.mint("a@b.com", &["ROLE_USER".to_string()], "/api/login").unwrap();

    assert_eq!(
        issuer.verify_access(&pair.refresh_token),
        Err(TokenError::SignatureInvalid)
    );
    assert_eq!(
        issuer.verify_refresh(&pair.access_token),
        Err(TokenError::SignatureInvalid)
    );
}

#[test]
fn test_access_token_expires_at_ttl() {
    let (issuer, clock) = create_issuer();
    let pair = issuer.mint("a@b.com", &[], "/api/login").unwrap();

    clock.advance(Duration::minutes(30) - Duration::seconds(1));
    assert!(issuer.verify_access(&pair.access_token).is_ok());

    clock.advance(Duration::seconds(1));
    assert_eq!(issuer.verify_access(&pair.access_token), Err(TokenError::Expired));
    // Refresh outlives access
    assert!(issuer.verify_refresh(&pair.refresh_token).is_ok());
}

#[test]
fn test_refresh_token_expires_after_days() {
    let (issuer, clock) = create_issuer();
    let pair = issuer.mint("a@b.com", &[], "/api/login").unwrap();

    clock.advance(Duration::days(30));
    assert_eq!(issuer.verify_refresh(&pair.refresh_token), Err(TokenError::Expired));
}

#[test]
fn test_garbage_and_tampered_tokens_rejected() {
    let (issuer, _) = create_issuer();
    assert_eq!(issuer.verify_access("not.a.jwt"), Err(TokenError::SignatureInvalid));
    assert_eq!(issuer.verify_access(""), Err(TokenError::SignatureInvalid));

    // Payload of one token, signature of another
    let victim = issuer.mint("a@b.com", &[], "/api/login").unwrap().access_token;
    let attacker = issuer.mint("x@y.com", &[], "/api/login").unwrap().access_token;
    let victim_parts: Vec<&str> = victim.split('.').collect();
    let attacker_parts: Vec<&str> = attacker.split('.').collect();
    let tampered = format!("{}.{}.{}", attacker_parts[0], victim_parts[1], attacker_parts[2]);
    assert_eq!(issuer.verify_access(&tampered), Err(TokenError::SignatureInvalid));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let (issuer, _) = create_issuer();
    let claims = RefreshClaims {
        sub: "a@b.com".to_string(),
        iss: "/api/login".to_string(),
        iat: 0,
        exp: i64::MAX / 2,
        jti: "forged".to_string(),
    };
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"other")).unwrap();

    assert_eq!(issuer.verify_refresh(&forged), Err(TokenError::SignatureInvalid));
}

#[test]
fn test_missing_subject_rejected() {
    let config = create_config();
    let (issuer, _) = create_issuer();
    let forged = encode(
        &Header::default(),
        &serde_json::json!({ "iss": "/api/login", "iat": 0, "exp": i64::MAX / 2, "jti": "no-sub" }),
        &EncodingKey::from_secret(&config.refresh_secret),
    )
    .unwrap();

    assert_eq!(issuer.verify_refresh(&forged), Err(TokenError::SignatureInvalid));
}

#[test]
fn test_invalid_base64_secret_is_rejected() {
    let config = JwtConfig {
        access_secret: "%%%".to_string(),
        ..JwtConfig::default()
    };
    let result = TokenIssuerConfig::from_jwt_config(&config);
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[test]
fn test_config_debug_redacts_secrets() {
    let rendered = format!("{:?}", create_config());
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("development"));
}
