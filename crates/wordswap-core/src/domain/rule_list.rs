//! Ordered rule list domain entity.
//!
//! [`RuleListModel`] is the single authoritative copy of the rule list while
//! the options page is open.  The rendering layer only projects it; edits
//! flow back through [`RuleListModel::update_at`] and the structural
//! operations below.
//!
//! # Ordering
//!
//! Position 0 is the highest priority rule.  Two promotion operations exist:
//!
//! ```text
//! promote_one(2)     [a, b, c, d]  ->  [a, c, b, d]
//! promote_to_top(2)  [a, b, c, d]  ->  [c, a, b, d]
//! ```
//!
//! Both are no-ops at position 0 and for out-of-range positions.  Out-of-range
//! positions are never an error: rows handed out by the UI are always in range,
//! so a stale position is simply ignored.

use tracing::debug;

use crate::domain::rule::Rule;

/// The ordered sequence of rules being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleListModel {
    rules: Vec<Rule>,
}

impl RuleListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model holding `rules` in the given order.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rule at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Rule> {
        self.rules.get(position)
    }

    /// Iterates over every row, placeholders included.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Inserts `rule` at the end of the list.
    pub fn append(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Appends a blank row.
    pub fn append_empty(&mut self) {
        self.append(Rule::empty());
    }

    /// Appends a blank row only when the list is empty, so the editor always
    /// has at least one row to type into.
    ///
    /// Returns `true` if a row was added.
    pub fn ensure_row(&mut self) -> bool {
        if self.rules.is_empty() {
            self.append_empty();
            true
        } else {
            false
        }
    }

    /// Replaces the rule at `position` with `rule`.
    ///
    /// Returns `false` and leaves the list untouched when `position` is out of range.
    pub fn update_at(&mut self, position: usize, rule: Rule) -> bool {
        match self.rules.get_mut(position) {
            Some(slot) => {
                *slot = rule;
                true
            }
            None => {
                debug!(position, len = self.rules.len(), "ignoring update of missing row");
                false
            }
        }
    }

    /// Removes and returns the rule at `position`.
    ///
    /// Returns `None` when `position` is out of range.
    pub fn delete_at(&mut self, position: usize) -> Option<Rule> {
        if position < self.rules.len() {
            Some(self.rules.remove(position))
        } else {
            debug!(position, len = self.rules.len(), "ignoring delete of missing row");
            None
        }
    }

    /// Swaps the rule at `position` with its predecessor.
    ///
    /// Returns `true` if the list changed.
    pub fn promote_one(&mut self, position: usize) -> bool {
        if position == 0 || position >= self.rules.len() {
            return false;
        }
        self.rules.swap(position - 1, position);
        true
    }

    /// Moves the rule at `position` to the head of the list, keeping the
    /// relative order of every other rule.
    ///
    /// Returns `true` if the list changed.
    pub fn promote_to_top(&mut self, position: usize) -> bool {
        if position == 0 || position >= self.rules.len() {
            return false;
        }
        self.rules[..=position].rotate_right(1);
        true
    }

    /// Discards the current contents and adopts `rules` verbatim.
    pub fn replace_all(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    /// Returns the persist-ready rules: every rule with a non-empty `from`,
    /// in list order.
    pub fn snapshot(&self) -> Vec<Rule> {
        self.rules
            .iter()
            .filter(|rule| !rule.is_placeholder())
            .cloned()
            .collect()
    }
}

impl From<Vec<Rule>> for RuleListModel {
    fn from(rules: Vec<Rule>) -> Self {
        Self::from_rules(rules)
    }
}
