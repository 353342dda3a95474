//! Session store error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors raised by a [`crate::scopes::ScopeStrategy`].
#[derive(Debug, Error)]
pub enum ScopeError {
    /// No concrete scope storage has been configured.
    #[error("scope storage unconfigured: {0}")]
    Unimplemented(String),

    /// Stored scope data could not be interpreted.
    #[error("invalid scope data: {0}")]
    Invalid(String),
}

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The incoming credential-exchange payload is invalid, or saving it
    /// violated the unique-domain constraint.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Scope strategy error.
    #[error(transparent)]
    Scopes(#[from] ScopeError),

    /// No shop is registered under the given domain.
    #[error("shop not found: {0}")]
    NotFound(String),
}
