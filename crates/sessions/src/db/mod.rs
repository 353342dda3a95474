//! Database operations for merchant sessions.
//!
//! # Schema: `sessions`
//!
//! ## Tables
//!
//! - `shop` - One row per tenant installation, unique on the lowercased
//!   domain
//!
//! # Migrations
//!
//! Migrations are stored in `crates/sessions/migrations/` and run via
//! `sqlx::migrate!` or the sqlx CLI against the configured database.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use saltbox_core::{ShopDomain, ShopId};

use crate::models::{NewShop, ShopRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryShopRepository;
pub use postgres::PgShopRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique domain).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The persistence boundary for shop records.
///
/// Implementations must enforce the unique-domain invariant atomically:
/// when two concurrent inserts race on the same domain, the loser surfaces
/// [`RepositoryError::Conflict`].
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Find a shop by its ID.
    async fn find_by_id(&self, id: ShopId) -> Result<Option<ShopRecord>, RepositoryError>;

    /// Find a shop by its domain, case-insensitively.
    async fn find_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<ShopRecord>, RepositoryError>;

    /// Insert a new shop, returning the stored record with its assigned ID.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the domain is already
    /// claimed by another record.
    async fn insert(&self, shop: &NewShop) -> Result<ShopRecord, RepositoryError>;

    /// Rewrite a shop's token, scopes, and API version.
    ///
    /// Fails with [`RepositoryError::NotFound`] when no record matches the
    /// given ID.
    async fn update(&self, shop: &ShopRecord) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
