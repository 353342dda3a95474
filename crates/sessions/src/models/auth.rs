//! Credential-exchange result types.
//!
//! The OAuth handshake itself lives outside this crate; what arrives here is
//! its outcome: which shop authorized, with what token, under which scopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use saltbox_core::{AccessScopes, AccessToken};

/// The outcome of a successful credential exchange.
///
/// The domain is carried as a raw string because it comes straight from the
/// OAuth callback; [`crate::store::SessionStore::store`] validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResult {
    /// The shop domain that authorized the application.
    pub domain: String,
    /// The offline access token issued for that shop.
    pub token: AccessToken,
    /// Additional exchange data.
    #[serde(default)]
    pub extra: AuthExtra,
}

/// Extension bag attached to an [`AuthResult`].
///
/// Known fields are typed; anything else the exchange flow attaches is kept
/// verbatim in `rest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthExtra {
    /// Scopes the merchant granted during authorization.
    #[serde(default)]
    pub scopes: AccessScopes,
    /// Unrecognized extension fields, preserved as-is.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

impl AuthResult {
    /// Convenience constructor for the common domain/token/scopes triple.
    pub fn new(domain: impl Into<String>, token: impl Into<AccessToken>, scopes: AccessScopes) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            extra: AuthExtra {
                scopes,
                rest: serde_json::Map::new(),
            },
        }
    }
}
