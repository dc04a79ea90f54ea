//! Domain entities for Wordswap.
//!
//! Pure data types and ordering rules with no storage or UI dependencies.
//! Everything here can be compiled and tested on any platform without setup.
//!
//! Outer layers (application, infrastructure) depend on the domain; the
//! domain never depends on them.

/// A single find/replace directive.
pub mod rule;

/// The ordered, authoritative list of rules.
///
/// See [`rule_list::RuleListModel`] for the main type.
pub mod rule_list;

/// Global toggles persisted next to the rule list.
pub mod preferences;
