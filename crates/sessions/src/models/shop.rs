//! Shop domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use saltbox_core::{AccessToken, ApiVersion, ShopDomain, ShopId};

/// A registered shop installation (domain type).
///
/// One record per tenant, keyed by its unique domain. Created or updated on
/// every successful credential exchange; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ShopRecord {
    /// Unique shop ID, assigned at creation.
    pub id: ShopId,
    /// The tenant key. Unique across all records, case-insensitive.
    pub domain: ShopDomain,
    /// The current offline access token.
    pub token: AccessToken,
    /// Raw persisted scope representation. Interpretation is delegated to
    /// the configured scope strategy; `None` when no scopes were ever stored.
    pub access_scopes: Option<String>,
    /// API version negotiated at credential-exchange time.
    pub api_version: ApiVersion,
    /// When the shop was first installed.
    pub created_at: DateTime<Utc>,
    /// When the credentials were last updated.
    pub updated_at: DateTime<Utc>,
}

/// A shop about to be inserted, before an ID has been assigned.
#[derive(Debug, Clone)]
pub struct NewShop {
    /// The tenant key.
    pub domain: ShopDomain,
    /// The offline access token from the credential exchange.
    pub token: AccessToken,
    /// Raw persisted scope representation, if the scope strategy produced one.
    pub access_scopes: Option<String>,
    /// API version negotiated at credential-exchange time.
    pub api_version: ApiVersion,
}
