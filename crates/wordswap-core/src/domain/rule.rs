//! Replacement rule entity.
//!
//! A [`Rule`] pairs a `from` pattern with its `to` replacement and three
//! matching flags.  The serialised field names (`from`, `to`, `ic`, `mw`,
//! `sc`) are the ones found in storage and in the import/export buffer, so
//! they must never change.

use serde::{Deserialize, Serialize};

/// One find/replace directive with its matching flags.
///
/// Duplicates are allowed; two rules are never required to be distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Text pattern to match.  An empty `from` marks a placeholder row.
    pub from: String,
    /// Replacement text (may be empty).
    #[serde(default)]
    pub to: String,
    /// Case-insensitive matching.
    #[serde(rename = "ic", default)]
    pub ignore_case: bool,
    /// Match whole words only.
    #[serde(rename = "mw", default)]
    pub whole_word: bool,
    /// Smart-case matching.
    #[serde(rename = "sc", default)]
    pub smart_case: bool,
}

impl Rule {
    /// Creates a rule with all flags cleared.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    /// Creates a blank rule, used for the editable row shown when the list is empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` for incomplete rows that are never persisted.
    pub fn is_placeholder(&self) -> bool {
        self.from.is_empty()
    }

    pub fn with_ignore_case(mut self, on: bool) -> Self {
        self.ignore_case = on;
        self
    }

    pub fn with_whole_word(mut self, on: bool) -> Self {
        self.whole_word = on;
        self
    }

    pub fn with_smart_case(mut self, on: bool) -> Self {
        self.smart_case = on;
        self
    }
}

/// The rule list used the first time storage is empty.
pub fn seed_rules() -> Vec<Rule> {
    vec![Rule::new("mispell", "misspell")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rule_is_placeholder() {
        assert!(Rule::empty().is_placeholder());
    }

    #[test]
    fn test_rule_with_from_is_not_placeholder() {
        let rule = Rule::new("teh", "");
        assert!(!rule.is_placeholder());
    }

    #[test]
    fn test_seed_rules_contains_single_mispell_rule() {
        let seed = seed_rules();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].from, "mispell");
        assert_eq!(seed[0].to, "misspell");
        assert!(!seed[0].ignore_case);
        assert!(!seed[0].whole_word);
        assert!(!seed[0].smart_case);
    }

    #[test]
    fn test_rule_serializes_with_short_flag_names_in_order() {
        // Arrange
        let rule = Rule::new("a", "b").with_ignore_case(true);

        // Act
        let json = serde_json::to_string(&rule).expect("serialize");

        // Assert
        assert_eq!(
            json,
            r#"{"from":"a","to":"b","ic":true,"mw":false,"sc":false}"#
        );
    }

    #[test]
    fn test_rule_deserializes_with_missing_optional_fields() {
        let rule: Rule = serde_json::from_str(r#"{"from":"x"}"#).expect("deserialize");
        assert_eq!(rule, Rule::new("x", ""));
    }

    #[test]
    fn test_rule_without_from_fails_to_deserialize() {
        let result: Result<Rule, _> = serde_json::from_str(r#"{"to":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_flags_are_independent() {
        let rule = Rule::new("a", "b").with_whole_word(true).with_smart_case(true);
        assert!(!rule.ignore_case);
        assert!(rule.whole_word);
        assert!(rule.smart_case);
    }
}
