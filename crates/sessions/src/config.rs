//! Session store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SESSIONS_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version stamped on stored records
//!   (default: 2026-01)

use secrecy::SecretString;
use thiserror::Error;

use saltbox_core::ApiVersion;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Session store configuration.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// API version stamped on records at credential-exchange time
    pub api_version: ApiVersion,
}

impl SessionStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("SESSIONS_DATABASE_URL")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("SESSIONS_DATABASE_URL".to_owned()))?;

        let api_version = match std::env::var("SHOPIFY_API_VERSION") {
            Ok(raw) => ApiVersion::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_API_VERSION".to_owned(), e.to_string())
            })?,
            Err(_) => ApiVersion::default(),
        };

        Ok(Self {
            database_url,
            api_version,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unsafe_code)]
mod tests {
    use super::*;

    // Environment mutation is process-global, so everything lives in a
    // single test to avoid cross-test interference.
    #[test]
    fn test_from_env() {
        // SAFETY: single-threaded within this test; no other test in this
        // crate touches these variables.
        unsafe {
            std::env::remove_var("SESSIONS_DATABASE_URL");
            std::env::remove_var("SHOPIFY_API_VERSION");
        }
        assert!(matches!(
            SessionStoreConfig::from_env(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        unsafe {
            std::env::set_var("SESSIONS_DATABASE_URL", "postgres://localhost/saltbox_test");
        }
        let config = SessionStoreConfig::from_env().unwrap();
        assert_eq!(config.api_version, ApiVersion::default());

        unsafe {
            std::env::set_var("SHOPIFY_API_VERSION", "2025-07");
        }
        let config = SessionStoreConfig::from_env().unwrap();
        assert_eq!(config.api_version.as_str(), "2025-07");

        unsafe {
            std::env::set_var("SHOPIFY_API_VERSION", "");
        }
        assert!(matches!(
            SessionStoreConfig::from_env(),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));

        unsafe {
            std::env::remove_var("SESSIONS_DATABASE_URL");
            std::env::remove_var("SHOPIFY_API_VERSION");
        }
    }
}
