//! Core types for Saltbox.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod domain;
pub mod id;
pub mod scopes;
pub mod token;
pub mod version;

pub use domain::{DomainError, ShopDomain};
pub use id::*;
pub use scopes::AccessScopes;
pub use token::AccessToken;
pub use version::{ApiVersion, ApiVersionError};
