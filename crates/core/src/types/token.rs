//! Access token type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An offline access token issued by the merchant platform.
///
/// The token is an opaque credential; no structure is assumed or validated.
/// `Debug` output is redacted so tokens never leak into logs or error
/// messages carrying debug-formatted state.
///
/// ## Examples
///
/// ```
/// use saltbox_core::AccessToken;
///
/// let token = AccessToken::new("shpat_abc123");
/// assert_eq!(token.as_str(), "shpat_abc123");
/// assert_eq!(format!("{token:?}"), "AccessToken(\"[redacted]\")");
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new token from any string-like value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `AccessToken` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the token is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[redacted]").finish()
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for AccessToken {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AccessToken {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for AccessToken {
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
    fn test_debug_is_redacted() {
        let token = AccessToken::new("shpat_super_secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("shpat_super_secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let token = AccessToken::new("tok-A");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"tok-A\"");

        let parsed: AccessToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_is_empty() {
        assert!(AccessToken::new("").is_empty());
        assert!(!AccessToken::new("tok").is_empty());
    }
}
