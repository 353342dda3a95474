//! Scope storage strategies.
//!
//! How granted scopes are persisted is an application decision: some
//! embedders keep them on the shop row, some derive them from their own
//! domain model, some never store them at all. The [`ScopeStrategy`] trait
//! is the extension point; the store ships with a deliberately
//! unimplemented default so that nothing breaks before the embedder has
//! made that decision.

use async_trait::async_trait;

use saltbox_core::AccessScopes;

use crate::error::ScopeError;
use crate::models::ShopRecord;

/// Strategy deciding how granted scopes are stored on and read from a shop.
#[async_trait]
pub trait ScopeStrategy: Send + Sync {
    /// Encode a granted scope set into the form persisted on the shop row.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Unimplemented`] when the strategy does not
    /// define scope storage.
    fn encode(&self, scopes: &AccessScopes) -> Result<String, ScopeError>;

    /// Decode the persisted form back into a scope set.
    ///
    /// `raw` is `None` when no scopes were ever written for the shop.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Unimplemented`] when the strategy does not
    /// define scope storage, or [`ScopeError::Invalid`] when the stored
    /// data cannot be interpreted.
    fn decode(&self, raw: Option<&str>) -> Result<AccessScopes, ScopeError>;

    /// Persist a scope change decided outside the credential-exchange flow.
    ///
    /// The provided default only emits a warning and leaves the record
    /// untouched; override it to route the change through the embedding
    /// application's own domain logic.
    ///
    /// # Errors
    ///
    /// The default never fails; overrides may.
    async fn update_merchant_scopes(
        &self,
        shop: &ShopRecord,
        scopes: &AccessScopes,
    ) -> Result<(), ScopeError> {
        tracing::warn!(
            shop = %shop.domain,
            %scopes,
            "update_merchant_scopes must be overridden to handle storing scopes"
        );
        Ok(())
    }

    /// The scopes currently granted to a shop.
    ///
    /// May differ from what is stored on the row: an application can answer
    /// from its own records. Must be overridden to be usable.
    ///
    /// # Errors
    ///
    /// The provided default always fails with [`ScopeError::Unimplemented`].
    async fn merchant_scopes(&self, shop: &ShopRecord) -> Result<AccessScopes, ScopeError> {
        let _ = shop;
        Err(ScopeError::Unimplemented(
            "merchant_scopes must be overridden to hook into stored scopes".to_owned(),
        ))
    }
}

/// The default strategy: no scope storage is defined.
///
/// Every codec call fails with [`ScopeError::Unimplemented`]. The store
/// turns that into a dropped write on the storage path and an absent scope
/// set during session construction, so credential exchange keeps working
/// for applications that have not wired up scope storage yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredScopes;

#[async_trait]
impl ScopeStrategy for UnconfiguredScopes {
    fn encode(&self, _scopes: &AccessScopes) -> Result<String, ScopeError> {
        Err(ScopeError::Unimplemented(
            "a scope strategy must be configured to store scopes".to_owned(),
        ))
    }

    fn decode(&self, _raw: Option<&str>) -> Result<AccessScopes, ScopeError> {
        Err(ScopeError::Unimplemented(
            "a scope strategy must be configured to read scopes".to_owned(),
        ))
    }
}

/// Comma-separated scope storage on the shop row itself.
///
/// Stores scopes in the platform's own wire form (`"read_orders,write_products"`)
/// and answers [`ScopeStrategy::merchant_scopes`] straight from the row.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedScopes;

#[async_trait]
impl ScopeStrategy for DelimitedScopes {
    fn encode(&self, scopes: &AccessScopes) -> Result<String, ScopeError> {
        Ok(scopes.to_string())
    }

    fn decode(&self, raw: Option<&str>) -> Result<AccessScopes, ScopeError> {
        Ok(raw.map(AccessScopes::parse).unwrap_or_default())
    }

    async fn merchant_scopes(&self, shop: &ShopRecord) -> Result<AccessScopes, ScopeError> {
        self.decode(shop.access_scopes.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use saltbox_core::{AccessToken, ApiVersion, ShopDomain, ShopId};

    use super::*;

    fn shop_with_scopes(raw: Option<&str>) -> ShopRecord {
        ShopRecord {
            id: ShopId::new(1),
            domain: ShopDomain::parse("shop1.example.com").unwrap(),
            token: AccessToken::new("tok-A"),
            access_scopes: raw.map(str::to_owned),
            api_version: ApiVersion::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unconfigured_encode_fails() {
        let err = UnconfiguredScopes
            .encode(&AccessScopes::parse("read_orders"))
            .unwrap_err();
        assert!(matches!(err, ScopeError::Unimplemented(_)));
    }

    #[test]
    fn test_unconfigured_decode_fails() {
        let err = UnconfiguredScopes.decode(Some("read_orders")).unwrap_err();
        assert!(matches!(err, ScopeError::Unimplemented(_)));
    }

    #[tokio::test]
    async fn test_default_merchant_scopes_fails() {
        let err = UnconfiguredScopes
            .merchant_scopes(&shop_with_scopes(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ScopeError::Unimplemented(_)));
    }

    #[tokio::test]
    async fn test_default_update_merchant_scopes_is_noop() {
        let shop = shop_with_scopes(Some("read_orders"));
        UnconfiguredScopes
            .update_merchant_scopes(&shop, &AccessScopes::parse("write_products"))
            .await
            .unwrap();
        // The record is untouched; only a warning is emitted.
        assert_eq!(shop.access_scopes.as_deref(), Some("read_orders"));
    }

    #[test]
    fn test_delimited_roundtrip() {
        let scopes = AccessScopes::parse("write_products,read_orders");
        let raw = DelimitedScopes.encode(&scopes).unwrap();
        assert_eq!(raw, "read_orders,write_products");
        assert_eq!(DelimitedScopes.decode(Some(&raw)).unwrap(), scopes);
    }

    #[test]
    fn test_delimited_decode_absent_is_empty() {
        assert!(DelimitedScopes.decode(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delimited_merchant_scopes_reads_row() {
        let shop = shop_with_scopes(Some("read_orders"));
        let scopes = DelimitedScopes.merchant_scopes(&shop).await.unwrap();
        assert!(scopes.contains("read_orders"));
    }
}
