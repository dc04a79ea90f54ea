//! # wordswap-core
//!
//! Shared library for Wordswap containing the replacement rule model, the
//! persisted preference record, and the JSON text codec used for bulk
//! import/export.
//!
//! This crate has zero dependencies on storage engines, UI frameworks, or
//! async runtimes.  It is consumed by the `wordswap-options` application.
//!
//! # Architecture overview
//!
//! Wordswap keeps an ordered list of find/replace rules.  Earlier rules take
//! precedence over later ones, so the order of the list is part of its
//! meaning and the model exposes explicit reordering operations.
//!
//! - **`domain`** – Pure data and rules: [`Rule`], the ordered
//!   [`RuleListModel`], and the [`PreferenceSet`] stored alongside it.
//!
//! - **`exchange`** – How a rule list travels as plain text.  Rules are
//!   serialised to a canonical JSON array (`from`, `to`, `ic`, `mw`, `sc`) and
//!   parsed back, rejecting anything that is not an array of rule objects.

pub mod domain;
pub mod exchange;

pub use domain::preferences::{
    keys, parse_dynamic_timeout, PreferenceSet, DEFAULT_DYNAMIC_TIMEOUT_MS,
};
pub use domain::rule::{seed_rules, Rule};
pub use domain::rule_list::RuleListModel;
pub use exchange::codec::{export_text, import_text, ExchangeError};
