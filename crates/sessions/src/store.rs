//! The session store.
//!
//! A thin persistence adapter keyed by shop domain: store the outcome of a
//! credential exchange, rebuild a [`Session`] from it later. Scope handling
//! is delegated to the configured [`ScopeStrategy`] with an asymmetric
//! failure policy: an unconfigured strategy degrades writes to a warning so
//! credential exchange never breaks, but surfaces loudly on any path that
//! explicitly reads scopes.

use std::sync::Arc;

use saltbox_core::{AccessScopes, ApiVersion, ShopDomain, ShopId};

use crate::db::{RepositoryError, ShopRepository};
use crate::error::{ScopeError, SessionStoreError};
use crate::models::{AuthResult, NewShop, Session, SessionExtra, ShopRecord};
use crate::scopes::{ScopeStrategy, UnconfiguredScopes};

/// Persistence-backed store for merchant sessions, keyed by shop domain.
pub struct SessionStore<R> {
    repo: R,
    scopes: Arc<dyn ScopeStrategy>,
    api_version: ApiVersion,
}

impl<R: ShopRepository> SessionStore<R> {
    /// Create a store with the default (unconfigured) scope strategy.
    pub fn new(repo: R, api_version: ApiVersion) -> Self {
        Self::with_scope_strategy(repo, Arc::new(UnconfiguredScopes), api_version)
    }

    /// Create a store with an application-supplied scope strategy.
    pub fn with_scope_strategy(
        repo: R,
        scopes: Arc<dyn ScopeStrategy>,
        api_version: ApiVersion,
    ) -> Self {
        Self {
            repo,
            scopes,
            api_version,
        }
    }

    /// The repository backing this store.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The API version stamped on stored records.
    #[must_use]
    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Store the outcome of a credential exchange.
    ///
    /// Looks up the shop by domain (case-insensitively); creates it when
    /// absent, otherwise overwrites its token. Scope storage goes through
    /// the configured strategy; with no strategy configured the write is
    /// dropped with a warning. Returns the record's ID.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Validation`] when the domain is missing
    /// or invalid, or when a concurrent exchange for the same domain won
    /// the unique-constraint race. Repository failures propagate.
    pub async fn store(&self, auth: &AuthResult) -> Result<ShopId, SessionStoreError> {
        let domain = ShopDomain::parse(&auth.domain)
            .map_err(|e| SessionStoreError::Validation(e.to_string()))?;

        if let Some(mut shop) = self.repo.find_by_domain(&domain).await? {
            shop.token = auth.token.clone();
            shop.api_version = self.api_version.clone();
            self.stage_access_scopes(&mut shop.access_scopes, &auth.extra.scopes)?;
            self.repo
                .update(&shop)
                .await
                .map_err(Self::conflict_to_validation)?;
            Ok(shop.id)
        } else {
            let mut shop = NewShop {
                domain,
                token: auth.token.clone(),
                access_scopes: None,
                api_version: self.api_version.clone(),
            };
            self.stage_access_scopes(&mut shop.access_scopes, &auth.extra.scopes)?;
            let stored = self
                .repo
                .insert(&shop)
                .await
                .map_err(Self::conflict_to_validation)?;
            Ok(stored.id)
        }
    }

    /// Fetch a session by shop ID. `Ok(None)` when no record matches.
    ///
    /// # Errors
    ///
    /// Repository failures and non-`Unimplemented` scope decode failures
    /// propagate.
    pub async fn retrieve(&self, id: ShopId) -> Result<Option<Session>, SessionStoreError> {
        match self.repo.find_by_id(id).await? {
            Some(shop) => Ok(Some(self.construct_session(shop)?)),
            None => Ok(None),
        }
    }

    /// Fetch a session by shop domain, case-insensitively. `Ok(None)` when
    /// no record matches.
    ///
    /// # Errors
    ///
    /// Repository failures and non-`Unimplemented` scope decode failures
    /// propagate.
    pub async fn retrieve_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<Session>, SessionStoreError> {
        match self.repo.find_by_domain(domain).await? {
            Some(shop) => Ok(Some(self.construct_session(shop)?)),
            None => Ok(None),
        }
    }

    /// Fetch the stored scopes for a shop domain.
    ///
    /// Unlike session construction, this path does not soften an
    /// unconfigured strategy: whoever asks for scopes directly needs to
    /// know that storage is not wired up.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::NotFound`] when no shop is registered
    /// under the domain, and [`ScopeError::Unimplemented`] (wrapped) when
    /// no scope strategy is configured.
    pub async fn retrieve_scopes_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<AccessScopes, SessionStoreError> {
        let shop = self
            .repo
            .find_by_domain(domain)
            .await?
            .ok_or_else(|| SessionStoreError::NotFound(domain.to_string()))?;

        self.get_access_scopes(&shop)
    }

    /// Persist a scope change decided outside the credential-exchange flow.
    ///
    /// Delegates to the configured strategy; the default strategy warns and
    /// leaves the record untouched.
    ///
    /// # Errors
    ///
    /// Whatever the strategy override raises.
    pub async fn update_merchant_scopes(
        &self,
        shop: &ShopRecord,
        scopes: &AccessScopes,
    ) -> Result<(), SessionStoreError> {
        self.scopes
            .update_merchant_scopes(shop, scopes)
            .await
            .map_err(Into::into)
    }

    /// The scopes currently granted to a shop, as the application defines
    /// them.
    ///
    /// # Errors
    ///
    /// The default strategy always fails with [`ScopeError::Unimplemented`];
    /// overrides may fail with their own errors.
    pub async fn merchant_scopes(
        &self,
        shop: &ShopRecord,
    ) -> Result<AccessScopes, SessionStoreError> {
        self.scopes.merchant_scopes(shop).await.map_err(Into::into)
    }

    /// Stage an encoded scope value into a record slot about to be saved.
    ///
    /// An unconfigured strategy degrades to a warning and leaves the slot
    /// unchanged; credential storage must never break on missing scope
    /// wiring. Any other encode failure propagates.
    fn stage_access_scopes(
        &self,
        slot: &mut Option<String>,
        scopes: &AccessScopes,
    ) -> Result<(), SessionStoreError> {
        match self.scopes.encode(scopes) {
            Ok(raw) => {
                *slot = Some(raw);
                Ok(())
            }
            Err(ScopeError::Unimplemented(_)) => {
                tracing::warn!(
                    %scopes,
                    "scope strategy is not configured; dropping scope write"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the stored scopes off a record through the strategy.
    ///
    /// An unconfigured strategy is re-raised here, with a message pointing
    /// at the missing override.
    fn get_access_scopes(&self, shop: &ShopRecord) -> Result<AccessScopes, SessionStoreError> {
        self.scopes
            .decode(shop.access_scopes.as_deref())
            .map_err(|e| match e {
                ScopeError::Unimplemented(_) => ScopeError::Unimplemented(
                    "a scope strategy must be configured to read stored scopes".to_owned(),
                )
                .into(),
                other => other.into(),
            })
    }

    /// Build a [`Session`] from a stored record.
    ///
    /// An unconfigured strategy yields `extra.scopes = None` rather than an
    /// error; any other decode failure propagates.
    fn construct_session(&self, shop: ShopRecord) -> Result<Session, SessionStoreError> {
        let scopes = match self.scopes.decode(shop.access_scopes.as_deref()) {
            Ok(scopes) => Some(scopes),
            Err(ScopeError::Unimplemented(_)) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Session {
            domain: shop.domain,
            token: shop.token,
            api_version: shop.api_version,
            extra: SessionExtra { scopes },
        })
    }

    fn conflict_to_validation(err: RepositoryError) -> SessionStoreError {
        match err {
            RepositoryError::Conflict(msg) => SessionStoreError::Validation(msg),
            other => SessionStoreError::Repository(other),
        }
    }
}
