//! Newtype IDs for type-safe entity references.
//!
//! Product identifiers come from the catalog backend, which may hand them out
//! as JSON strings or JSON integers. [`ProductId`] normalizes both to their
//! string form so that `7` and `"7"` refer to the same product.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// Opaque product identifier.
///
/// ## Examples
///
/// ```
/// use shopcart_core::ProductId;
///
/// let a = ProductId::parse("42").unwrap();
/// let b = ProductId::from(42_u64);
/// assert_eq!(a, b);
///
/// assert!(ProductId::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from a string.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Wire representation accepted for product ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawProductId::deserialize(deserializer)? {
            RawProductId::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            RawProductId::Signed(n) => Ok(Self::from(n)),
            RawProductId::Unsigned(n) => Ok(Self::from(n)),
        }
    }
}

/// Identifier for one user session.
///
/// A session bounds the lifetime of a cart; ids are random v4 UUIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random session id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  p1 ").unwrap();
        assert_eq!(id.as_str(), "p1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_numeric_and_text_ids_are_equal() {
        assert_eq!(ProductId::from(7_u64), ProductId::parse("7").unwrap());
        assert_eq!(ProductId::from(-3_i64).as_str(), "-3");
    }

    #[test]
    fn test_deserialize_from_string_or_number() {
        let from_text: ProductId = serde_json::from_str("\"7\"").unwrap();
        let from_number: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(from_text, from_number);
    }

    #[test]
    fn test_deserialize_rejects_empty_string() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&ProductId::from(12_u64)).unwrap();
        assert_eq!(json, "\"12\"");
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_session_id_display_matches_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(SessionId::from_uuid(uuid).to_string(), uuid.to_string());
    }
}
