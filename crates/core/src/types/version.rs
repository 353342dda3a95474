//! API version type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ApiVersion`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ApiVersionError {
    /// The input string is empty.
    #[error("api version cannot be empty")]
    Empty,
}

/// A merchant platform API version, e.g. `2026-01` or `unstable`.
///
/// Versions are opaque release names; only non-emptiness is enforced. The
/// version recorded on a shop is the one negotiated when its credentials
/// were last exchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Parse an `ApiVersion` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiVersionError::Empty`] if the input is empty.
    pub fn parse(s: &str) -> Result<Self, ApiVersionError> {
        if s.is_empty() {
            return Err(ApiVersionError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ApiVersion` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for ApiVersion {
    /// The current stable release.
    fn default() -> Self {
        Self("2026-01".to_owned())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = ApiVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ApiVersion {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ApiVersion {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ApiVersion {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(ApiVersion::parse("2026-01").is_ok());
        assert!(ApiVersion::parse("unstable").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(ApiVersion::parse(""), Err(ApiVersionError::Empty)));
    }

    #[test]
    fn test_default() {
        assert_eq!(ApiVersion::default().as_str(), "2026-01");
    }

    #[test]
    fn test_display() {
        let version = ApiVersion::parse("2026-01").unwrap();
        assert_eq!(format!("{version}"), "2026-01");
    }
}
