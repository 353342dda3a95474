//! Postgres-backed repository integration tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `SESSIONS_DATABASE_URL` pointing at it (the `sessions` schema is
//!   created by the bundled migrations)
//!
//! Run with: `cargo test -p saltbox-sessions -- --ignored`

#![allow(clippy::unwrap_used)]

use saltbox_core::{AccessScopes, AccessToken, ApiVersion, ShopDomain};
use saltbox_sessions::{
    AuthResult, PgShopRepository, SessionStore, SessionStoreConfig, create_pool,
};

async fn pg_store() -> SessionStore<PgShopRepository> {
    let config = SessionStoreConfig::from_env().expect("SESSIONS_DATABASE_URL must be set");
    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    let repo = PgShopRepository::new(pool);
    repo.migrate().await.expect("Failed to run migrations");
    SessionStore::new(repo, config.api_version)
}

/// Unique per-run domain so repeated test runs don't collide on the
/// unique-domain index.
fn test_domain(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{prefix}-{}-{nanos}.example.com", std::process::id())
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn pg_store_and_retrieve_roundtrip() {
    let store = pg_store().await;
    let domain = test_domain("roundtrip");

    let id = store
        .store(&AuthResult::new(
            domain.clone(),
            "tok-A",
            AccessScopes::parse("read_orders"),
        ))
        .await
        .unwrap();

    let session = store.retrieve(id).await.unwrap().unwrap();
    assert_eq!(session.domain, ShopDomain::parse(&domain).unwrap());
    assert_eq!(session.token, AccessToken::new("tok-A"));
    assert_eq!(session.api_version, ApiVersion::default());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn pg_second_store_updates_in_place() {
    let store = pg_store().await;
    let domain = test_domain("update");
    let upper = domain.to_uppercase();

    let first = store
        .store(&AuthResult::new(domain, "tok-A", AccessScopes::new()))
        .await
        .unwrap();
    let second = store
        .store(&AuthResult::new(upper, "tok-B", AccessScopes::new()))
        .await
        .unwrap();

    assert_eq!(first, second);
    let session = store.retrieve(first).await.unwrap().unwrap();
    assert_eq!(session.token, AccessToken::new("tok-B"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn pg_case_insensitive_domain_lookup() {
    let store = pg_store().await;
    let domain = test_domain("Lookup");

    store
        .store(&AuthResult::new(domain.clone(), "tok-A", AccessScopes::new()))
        .await
        .unwrap();

    let lowered = ShopDomain::parse(&domain.to_lowercase()).unwrap();
    let session = store.retrieve_by_domain(&lowered).await.unwrap();
    assert!(session.is_some());
}
