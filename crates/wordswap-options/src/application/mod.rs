//! Application layer use cases for the options page.
//!
//! Use cases in this layer orchestrate domain objects to fulfil a user goal,
//! depend on abstractions (the [`preferences_store::KeyValueStore`] trait)
//! rather than concrete stores, and contain no file system access.
//!
//! # Sub-modules
//!
//! - **`preferences_store`** – Loads the persisted preferences at startup and
//!   commits the in-memory state as one whole-record write.
//!
//! - **`saved_indicator`** – The transient "saved" confirmation with its
//!   cancellable auto-hide timer.
//!
//! - **`options_page`** – The editing session: row operations, toggles, the
//!   import/export scratchpad, and save/import/clear.

pub mod options_page;
pub mod preferences_store;
pub mod saved_indicator;
