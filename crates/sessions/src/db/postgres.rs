//! Postgres-backed shop repository.
//!
//! Queries are runtime-bound rather than macro-checked so the crate builds
//! without a database reachable at compile time. Uniqueness on the domain is
//! enforced by a unique index over `LOWER(shopify_domain)`; the losing
//! writer of a concurrent insert race gets [`RepositoryError::Conflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use saltbox_core::{AccessToken, ApiVersion, ShopDomain, ShopId};

use super::{RepositoryError, ShopRepository};
use crate::models::{NewShop, ShopRecord};

const SHOP_COLUMNS: &str =
    "id, shopify_domain, shopify_token, access_scopes, api_version, created_at, updated_at";

/// Repository for shop records in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgShopRepository {
    pool: PgPool,
}

/// Raw row shape; converted to [`ShopRecord`] with validation.
#[derive(sqlx::FromRow)]
struct ShopRow {
    id: i64,
    shopify_domain: String,
    shopify_token: String,
    access_scopes: Option<String>,
    api_version: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShopRow {
    fn into_record(self) -> Result<ShopRecord, RepositoryError> {
        let domain = ShopDomain::parse(&self.shopify_domain).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid shop domain in database: {e}"))
        })?;
        let api_version = ApiVersion::parse(&self.api_version).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid api version in database: {e}"))
        })?;

        Ok(ShopRecord {
            id: ShopId::new(self.id),
            domain,
            token: AccessToken::new(self.shopify_token),
            access_scopes: self.access_scopes,
            api_version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PgShopRepository {
    /// Create a new shop repository over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the bundled migrations for the `sessions` schema.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::migrate::MigrateError` if a migration fails.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl ShopRepository for PgShopRepository {
    async fn find_by_id(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM sessions.shop WHERE id = $1");
        let row: Option<ShopRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ShopRow::into_record).transpose()
    }

    async fn find_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<ShopRecord>, RepositoryError> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS} FROM sessions.shop WHERE LOWER(shopify_domain) = $1"
        );
        let row: Option<ShopRow> = sqlx::query_as(&sql)
            .bind(domain.normalized())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ShopRow::into_record).transpose()
    }

    async fn insert(&self, shop: &NewShop) -> Result<ShopRecord, RepositoryError> {
        let sql = format!(
            "INSERT INTO sessions.shop (shopify_domain, shopify_token, access_scopes, api_version) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SHOP_COLUMNS}"
        );
        let row: ShopRow = sqlx::query_as(&sql)
            .bind(&shop.domain)
            .bind(&shop.token)
            .bind(shop.access_scopes.as_deref())
            .bind(&shop.api_version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "shop domain already exists: {}",
                        shop.domain
                    ));
                }
                RepositoryError::Database(e)
            })?;

        row.into_record()
    }

    async fn update(&self, shop: &ShopRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE sessions.shop \
             SET shopify_token = $1, access_scopes = $2, api_version = $3, updated_at = NOW() \
             WHERE id = $4",
        )
        .bind(&shop.token)
        .bind(shop.access_scopes.as_deref())
        .bind(&shop.api_version)
        .bind(shop.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
