//! Product identifier newtype.
//!
//! Product IDs are opaque catalog strings. Keeping them in a newtype prevents
//! accidentally passing a title or image URL where an ID is expected.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty or whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// Identifier of a catalog product, unique among the items of a cart.
///
/// Deserialization is transparent and performs no validation, so values
/// restored from storage are adopted as-is. Use [`ProductId::parse`] for
/// user-supplied input.
///
/// ## Examples
///
/// ```
/// use go_marketplace_core::ProductId;
///
/// let id = ProductId::parse("1").unwrap();
/// assert_eq!(id.as_str(), "1");
///
/// assert!(ProductId::parse("").is_err());
/// assert!(ProductId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if the input is empty or whitespace.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        if s.trim().is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the ID as a string slice.
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
        f.write_str(&self.0)
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

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse(" \t"), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_parse_keeps_input_verbatim() {
        let id = ProductId::parse(" sku-1 ").unwrap();
        assert_eq!(id.as_str(), " sku-1 ");
    }

    #[test]
    fn test_compare_with_str() {
        let id: ProductId = "abc".parse().unwrap();
        assert_eq!(id, "abc");
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_deserialize_is_transparent_and_unvalidated() {
        let id: ProductId = serde_json::from_str("\"\"").unwrap();
        assert_eq!(id.as_str(), "");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"\"");
    }
}
