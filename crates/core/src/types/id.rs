//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! The backend API is free to send identifiers as JSON numbers or strings.
//! IDs keep whatever representation they arrived with, so they serialize
//! back unchanged, but compare and hash by their canonical text: `10` and
//! `"10"` are the same product.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Wire representation shared by all ID types.
#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    /// Parse user input, preferring the numeric form.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_owned()), Self::Number)
    }

    /// Canonical text used for equality and hashing.
    #[must_use]
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`RawId`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash` (by canonical text)
/// - Constructors: `from_number()`, `from_text()`
/// - `Display`, `FromStr`, `From<i64>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use farmacare_core::define_id;
/// define_id!(ShelfId);
///
/// assert_eq!(ShelfId::from_number(7), ShelfId::from_text("7"));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name($crate::types::id::RawId);

        impl $name {
            /// Create an ID from a numeric value.
            #[must_use]
            pub const fn from_number(id: i64) -> Self {
                Self($crate::types::id::RawId::Number(id))
            }

            /// Create an ID from a textual value.
            #[must_use]
            pub fn from_text(id: impl Into<String>) -> Self {
                Self($crate::types::id::RawId::Text(id.into()))
            }

            /// Canonical text form of the ID.
            #[must_use]
            pub fn canonical(&self) -> ::std::borrow::Cow<'_, str> {
                self.0.canonical()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.canonical() == other.canonical()
            }
        }

        impl Eq for $name {}

        impl ::core::hash::Hash for $name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                self.canonical().hash(state);
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.canonical())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self($crate::types::id::RawId::parse(s)))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::from_number(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self($crate::types::id::RawId::parse(id))
            }
        }
    };
}

define_id!(ProductId);
define_id!(PurchaseId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_numeric_and_text_ids_compare_equal() {
        assert_eq!(ProductId::from_number(10), ProductId::from_text("10"));
        assert_ne!(ProductId::from_number(10), ProductId::from_text("010"));
    }

    #[test]
    fn test_hash_follows_equality() {
        let mut set = HashSet::new();
        set.insert(ProductId::from_number(3));
        assert!(set.contains(&ProductId::from_text("3")));
    }

    #[test]
    fn test_from_str_prefers_numbers() {
        let id: ProductId = " 42 ".parse().unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!(42));

        let id: ProductId = "abc-1".parse().unwrap();
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::json!("abc-1")
        );
    }

    #[test]
    fn test_serde_keeps_original_representation() {
        let id: ProductId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");

        let id: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn test_display() {
        assert_eq!(PurchaseId::from_number(99).to_string(), "99");
        assert_eq!(PurchaseId::from_text("p-1").to_string(), "p-1");
    }
}
