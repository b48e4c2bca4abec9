//! Token entities for JWT-based session authentication.

use serde::{Deserialize, Serialize};

/// Prefix shared by the `Authorization` and `RefreshToken` header values
pub const JWT_PREFIX: &str = "Bearer ";

/// Header carrying the access token
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header carrying the refresh token
pub const REFRESH_TOKEN_HEADER: &str = "RefreshToken";

/// Prefix prepended to a role name to form an authority
pub const ROLE_PREFIX: &str = "ROLE_";

/// Single authority entry as carried in the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantedAuthority {
    pub authority: String,
}

impl GrantedAuthority {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }
}

/// Claims of a short-lived access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Lowercased email of the account
    pub sub: String,

    /// Granted authorities, e.g. `[{"authority": "ROLE_USER"}]`
    pub authorities: Vec<GrantedAuthority>,

    /// Request path the token was issued from
    pub iss: String,

    pub iat: i64,
    pub exp: i64,

    /// Unique per mint, so two pairs issued in the same second still differ
    pub jti: String,
}

impl AccessClaims {
    /// Authority names carried by the token
    pub fn authority_names(&self) -> Vec<String> {
        self.authorities.iter().map(|a| a.authority.clone()).collect()
    }
}

/// Claims of a long-lived refresh token; identity only, no authorities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Access and refresh tokens minted together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Value for the `Authorization` response header
    pub fn authorization_header_value(&self) -> String {
        format!("{}{}", JWT_PREFIX, self.access_token)
    }

    /// Value for the `RefreshToken` response header
    pub fn refresh_header_value(&self) -> String {
        format!("{}{}", JWT_PREFIX, self.refresh_token)
    }
}

/// Strip the `Bearer ` prefix from a header value
///
/// Returns `None` when the prefix is missing or nothing follows it.
pub fn strip_bearer_prefix(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix(JWT_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
