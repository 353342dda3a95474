//! Saltbox merchant session persistence.
//!
//! Stores the domain/token/scopes triple produced by a credential exchange
//! and reconstructs a usable [`models::Session`] from stored state. One
//! tenant = one shop, keyed by its domain.
//!
//! The [`store::SessionStore`] sits on top of a [`db::ShopRepository`]
//! (Postgres-backed or in-memory) and delegates scope storage to an
//! injectable [`scopes::ScopeStrategy`], so the embedding application
//! decides how granted scopes are persisted and read back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scopes;
pub mod store;

pub use config::{ConfigError, SessionStoreConfig};
pub use db::{MemoryShopRepository, PgShopRepository, RepositoryError, ShopRepository, create_pool};
pub use error::{ScopeError, SessionStoreError};
pub use models::{AuthExtra, AuthResult, NewShop, Session, SessionExtra, ShopRecord};
pub use scopes::{DelimitedScopes, ScopeStrategy, UnconfiguredScopes};
pub use store::SessionStore;
