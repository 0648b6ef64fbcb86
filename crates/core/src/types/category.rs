//! Product category label.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The input is empty or whitespace only.
    #[error("category cannot be blank")]
    Blank,
    /// The input is too long.
    #[error("category must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A category label, e.g. `"Analgésicos"`.
///
/// Labels coming from the backend are taken verbatim. Labels coming from
/// visitors go through [`Category::parse`], which rejects blank input but
/// never rewrites the label: filtering is an exact match, so a trimmed
/// label would no longer match the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Maximum accepted length of a visitor-supplied label.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `Category` from visitor input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or longer than
    /// [`Category::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        if s.trim().is_empty() {
            return Err(CategoryError::Blank);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(CategoryError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Category::parse("Vitaminas").unwrap().as_str(), "Vitaminas");
    }

    #[test]
    fn test_parse_keeps_label_verbatim() {
        assert_eq!(Category::parse(" Bebés ").unwrap().as_str(), " Bebés ");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Category::parse(""), Err(CategoryError::Blank));
        assert_eq!(Category::parse("   "), Err(CategoryError::Blank));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(Category::MAX_LENGTH + 1);
        assert!(matches!(
            Category::parse(&long),
            Err(CategoryError::TooLong { .. })
        ));
    }

    #[test]
    fn test_deserialize_is_unvalidated() {
        let category: Category = serde_json::from_str("\"\"").unwrap();
        assert_eq!(category.as_str(), "");
    }
}
