//! Special rule references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reference to a named special rule, optionally parametrized.
///
/// Two rules are the same rule only when both name and rating match:
/// `Tough(3)` and `Tough(6)` are distinct entries.
///
/// # Example RON
///
/// ```ron
/// SpecialRule(name: "Tough", rating: Some("3"))
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecialRule {
    /// Rule name as printed in the army book.
    pub name: String,

    /// Rule parameter, if the rule takes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl SpecialRule {
    /// Create an unparametrized rule.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: None,
        }
    }

    /// Create a rule with a parameter.
    #[must_use]
    pub fn rated(name: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: Some(rating.into()),
        }
    }

    /// Check whether this rule has the given name, ignoring its rating.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Display for SpecialRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rating {
            Some(rating) => write!(f, "{}({})", self.name, rating),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_rating() {
        assert_eq!(SpecialRule::rated("Tough", "3").to_string(), "Tough(3)");
        assert_eq!(SpecialRule::new("Fearless").to_string(), "Fearless");
    }

    #[test]
    fn test_rating_is_part_of_identity() {
        assert_ne!(SpecialRule::rated("Tough", "3"), SpecialRule::rated("Tough", "6"));
        assert!(SpecialRule::rated("Tough", "3").is_named("Tough"));
    }
}
