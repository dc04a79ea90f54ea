//! JSON text codec for bulk import and export of rule lists.
//!
//! Text format:
//! ```text
//! [{"from":"teh","to":"the","ic":false,"mw":true,"sc":false}, ...]
//! ```
//! One object per rule, keys in the order `from`, `to`, `ic`, `mw`, `sc`.
//! On import only `from` is required; `to` defaults to `""` and the flags
//! default to `false`.  Unknown keys are ignored.

use serde_json::Value;
use thiserror::Error;

use crate::domain::rule::Rule;

/// Errors that can occur while parsing an import buffer.
///
/// Every variant is a parse failure: the buffer is rejected as a whole and
/// no rules are produced.
#[derive(Debug, Error, PartialEq)]
pub enum ExchangeError {
    /// The text is not valid JSON.
    #[error("import text is not valid JSON: {0}")]
    InvalidJson(String),

    /// The text is valid JSON but the top-level value is not an array.
    #[error("import text must be a JSON array of rules")]
    NotAnArray,

    /// An array element is not a rule-shaped object.
    #[error("rule #{index} is malformed: {reason}")]
    InvalidRule { index: usize, reason: String },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Serialises `rules` to the canonical single-line JSON text.
///
/// # Examples
///
/// ```rust
/// use wordswap_core::{export_text, Rule};
///
/// let text = export_text(&[Rule::new("a", "b")]);
/// assert_eq!(text, r#"[{"from":"a","to":"b","ic":false,"mw":false,"sc":false}]"#);
/// ```
pub fn export_text(rules: &[Rule]) -> String {
    // Rules hold only strings and booleans, which always serialise.
    serde_json::to_string(rules).unwrap_or_else(|_| String::from("[]"))
}

/// Parses an import buffer into an ordered rule sequence.
///
/// # Errors
///
/// Returns [`ExchangeError::InvalidJson`] for text that is not JSON,
/// [`ExchangeError::NotAnArray`] when the top-level value is not an array, and
/// [`ExchangeError::InvalidRule`] for the first element that is not an object
/// with a string `from` (or that carries a field of the wrong type).
///
/// # Examples
///
/// ```rust
/// use wordswap_core::{import_text, ExchangeError};
///
/// let rules = import_text(r#"[{"from":"a","to":"b","ic":true}]"#).unwrap();
/// assert!(rules[0].ignore_case);
///
/// assert!(matches!(import_text("not json"), Err(ExchangeError::InvalidJson(_))));
/// ```
pub fn import_text(text: &str) -> Result<Vec<Rule>, ExchangeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ExchangeError::InvalidJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ExchangeError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_rule(index, item))
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn decode_rule(index: usize, item: Value) -> Result<Rule, ExchangeError> {
    // serde would also accept a positional array for a struct; only objects count.
    if !item.is_object() {
        return Err(ExchangeError::InvalidRule {
            index,
            reason: format!("expected an object, found {}", kind_of(&item)),
        });
    }
    serde_json::from_value(item).map_err(|e| ExchangeError::InvalidRule {
        index,
        reason: e.to_string(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
