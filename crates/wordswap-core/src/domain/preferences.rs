//! The persisted preference record.
//!
//! [`PreferenceSet`] is written to storage as five independent keys.  Every
//! save overwrites all five together; there is no partial update.  Each key
//! is read back on its own, so one bad value never costs the others.

use crate::domain::rule::{seed_rules, Rule};

/// Delay used when the dynamic timeout text cannot be parsed.
pub const DEFAULT_DYNAMIC_TIMEOUT_MS: u64 = 2000;

/// Storage keys, one per [`PreferenceSet`] field.
pub mod keys {
    pub const RULES: &str = "rules";
    pub const USE_DYNAMIC_MODE: &str = "useDynamicMode";
    pub const DYNAMIC_TIMEOUT_MS: &str = "dynamicTimeoutMs";
    pub const SKIP_PRE_TAGS: &str = "skipPreTags";
    pub const SKIP_CODE_TAGS: &str = "skipCodeTags";

    /// All keys in the order they are written.
    pub const ALL: [&str; 5] = [
        RULES,
        USE_DYNAMIC_MODE,
        DYNAMIC_TIMEOUT_MS,
        SKIP_PRE_TAGS,
        SKIP_CODE_TAGS,
    ];
}

/// Rule list plus the global toggles stored next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSet {
    pub rules: Vec<Rule>,
    pub use_dynamic_mode: bool,
    pub dynamic_timeout_ms: u64,
    pub skip_pre_tags: bool,
    pub skip_code_tags: bool,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            rules: seed_rules(),
            use_dynamic_mode: false,
            dynamic_timeout_ms: DEFAULT_DYNAMIC_TIMEOUT_MS,
            skip_pre_tags: false,
            skip_code_tags: false,
        }
    }
}

/// Parses the dynamic timeout as typed by the user.
///
/// Reads the leading integer of `text` (surrounding whitespace and an optional
/// `+` allowed, trailing garbage ignored, so `"1500ms"` is 1500).  Returns
/// `None` when there are no leading digits, the value is negative, or it does
/// not fit in a `u64`.
pub fn parse_dynamic_timeout(text: &str) -> Option<u64> {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
