//! Authenticated principal attached to a request.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AccessClaims, AccountType, ROLE_PREFIX};

/// Identity recovered from a verified, still-pinned access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub account_type: AccountType,
    /// Lowercased email
    pub subject: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn from_claims(account_type: AccountType, claims: &AccessClaims) -> Self {
        Self {
            account_type,
            subject: claims.sub.clone(),
            authorities: claims.authority_names(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Role check without the `ROLE_` prefix, e.g. `has_role("ADMIN")`
    pub fn has_role(&self, role: &str) -> bool {
        self.has_authority(&format!("{}{}", ROLE_PREFIX, role))
    }
}
