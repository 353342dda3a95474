//! In-memory shop repository.
//!
//! Backs the test suite and embedders that want an ephemeral store (dev
//! setups, single-process tools). Enforces the same unique-domain invariant
//! as the Postgres implementation by keying on the lowercased domain.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use saltbox_core::{ShopDomain, ShopId};

use super::{RepositoryError, ShopRepository};
use crate::models::{NewShop, ShopRecord};

/// Repository for shop records held in process memory.
#[derive(Debug, Default)]
pub struct MemoryShopRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by the normalized (lowercased) domain.
    shops: HashMap<String, ShopRecord>,
    next_id: i64,
}

impl MemoryShopRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shops.
    pub async fn len(&self) -> usize {
        self.inner.read().await.shops.len()
    }

    /// Whether the repository holds no shops.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.shops.is_empty()
    }
}

#[async_trait]
impl ShopRepository for MemoryShopRepository {
    async fn find_by_id(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.shops.values().find(|shop| shop.id == id).cloned())
    }

    async fn find_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<ShopRecord>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.shops.get(&domain.normalized()).cloned())
    }

    async fn insert(&self, shop: &NewShop) -> Result<ShopRecord, RepositoryError> {
        let mut inner = self.inner.write().await;
        let key = shop.domain.normalized();

        if inner.shops.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "shop domain already exists: {}",
                shop.domain
            )));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = ShopRecord {
            id: ShopId::new(inner.next_id),
            domain: shop.domain.clone(),
            token: shop.token.clone(),
            access_scopes: shop.access_scopes.clone(),
            api_version: shop.api_version.clone(),
            created_at: now,
            updated_at: now,
        };

        inner.shops.insert(key, record.clone());
        Ok(record)
    }

    async fn update(&self, shop: &ShopRecord) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .shops
            .values_mut()
            .find(|existing| existing.id == shop.id)
            .ok_or(RepositoryError::NotFound)?;

        stored.token = shop.token.clone();
        stored.access_scopes = shop.access_scopes.clone();
        stored.api_version = shop.api_version.clone();
        stored.updated_at = Utc::now();

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use saltbox_core::{AccessToken, ApiVersion};

    use super::*;

    fn new_shop(domain: &str, token: &str) -> NewShop {
        NewShop {
            domain: ShopDomain::parse(domain).unwrap(),
            token: AccessToken::new(token),
            access_scopes: None,
            api_version: ApiVersion::default(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = MemoryShopRepository::new();
        let record = repo.insert(&new_shop("shop1.example.com", "tok-A")).await.unwrap();

        let by_id = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(by_id.token, AccessToken::new("tok-A"));

        let domain = ShopDomain::parse("shop1.example.com").unwrap();
        let by_domain = repo.find_by_domain(&domain).await.unwrap().unwrap();
        assert_eq!(by_domain.id, record.id);
    }

    #[tokio::test]
    async fn test_insert_conflict_on_case_variant() {
        let repo = MemoryShopRepository::new();
        repo.insert(&new_shop("Shop1.example.com", "tok-A")).await.unwrap();

        let err = repo
            .insert(&new_shop("shop1.EXAMPLE.com", "tok-B"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryShopRepository::new();
        let mut record = repo.insert(&new_shop("shop1.example.com", "tok-A")).await.unwrap();
        record.id = ShopId::new(999);

        let err = repo.update(&record).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_rewrites_credentials() {
        let repo = MemoryShopRepository::new();
        let mut record = repo.insert(&new_shop("shop1.example.com", "tok-A")).await.unwrap();

        record.token = AccessToken::new("tok-B");
        record.access_scopes = Some("read_orders".to_owned());
        repo.update(&record).await.unwrap();

        let stored = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored.token, AccessToken::new("tok-B"));
        assert_eq!(stored.access_scopes.as_deref(), Some("read_orders"));
    }
}
