//! Session handle types.
//!
//! The transient, read-only object assembled from stored state and handed
//! to API-calling code. Never persisted directly.

use serde::{Deserialize, Serialize};

use saltbox_core::{AccessScopes, AccessToken, ApiVersion, ShopDomain};

/// A usable merchant session, reconstructed from a stored shop record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// The shop this session authenticates against.
    pub domain: ShopDomain,
    /// The access token to present to the platform API.
    pub token: AccessToken,
    /// The API version negotiated when the credentials were exchanged.
    pub api_version: ApiVersion,
    /// Additional session data.
    pub extra: SessionExtra,
}

/// Extension data attached to a [`Session`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionExtra {
    /// Scopes stored for the shop, or `None` when scope storage is not
    /// configured in the embedding application.
    pub scopes: Option<AccessScopes>,
}
