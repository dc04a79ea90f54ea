//! PreferencesStore: synchronises the rule list and global flags with storage.
//!
//! The store is the only code that talks to the [`KeyValueStore`].  It loads
//! the five preference keys once at startup and, on every save, overwrites all
//! five in a single `set` call.
//!
//! # Architecture
//!
//! This use case depends only on the [`KeyValueStore`] trait and domain types.
//! The concrete store (in-memory, JSON file, ...) is injected at construction
//! time, making the use case fully unit-testable.
//!
//! # Timeout text
//!
//! The dynamic timeout arrives as raw text from an input field.  Text without a
//! leading integer is not an error: the default of 2000 ms is stored instead
//! so a typo never blocks saving the rules.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use wordswap_core::{
    domain::preferences::keys, export_text, import_text, parse_dynamic_timeout, ExchangeError,
    PreferenceSet, Rule, RuleListModel, DEFAULT_DYNAMIC_TIMEOUT_MS,
};

use crate::application::saved_indicator::SavedIndicator;

/// One storage record: string keys mapped to JSON values.
pub type StorageRecord = Map<String, Value>;

/// Error reported by a [`KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing store at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialised.
    #[error("failed to serialize store record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The persisted data is not a JSON object.
    #[error("store at {path} is corrupt: {reason}")]
    Corrupt {
        path: std::path::PathBuf,
        reason: String,
    },

    /// The backing store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error type for the preferences use case.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The import buffer could not be parsed.  Nothing was changed.
    #[error(transparent)]
    Import(#[from] ExchangeError),
}

/// Async string-keyed JSON store.
///
/// `get` receives every key it should read together with the value to return
/// when the key is absent.  `set` overwrites the given keys and leaves others
/// untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the keys of `defaults`, substituting the default for absent keys.
    async fn get(&self, defaults: StorageRecord) -> Result<StorageRecord, StorageError>;

    /// Writes every entry of `record`.
    async fn set(&self, record: StorageRecord) -> Result<(), StorageError>;
}

/// In-memory edits waiting to be committed.
///
/// `rules` may still contain placeholder rows; they are dropped on save.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceDraft<'a> {
    pub rules: &'a RuleListModel,
    pub use_dynamic_mode: bool,
    /// The timeout exactly as typed.
    pub dynamic_timeout_text: &'a str,
    pub skip_pre_tags: bool,
    pub skip_code_tags: bool,
}

/// Loads and commits [`PreferenceSet`]s through a [`KeyValueStore`].
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
    indicator: SavedIndicator,
}

impl PreferencesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_indicator(store, SavedIndicator::new())
    }

    /// Creates a store whose saved indicator hides after `delay`.
    pub fn with_indicator_delay(store: Arc<dyn KeyValueStore>, delay: Duration) -> Self {
        Self::with_indicator(store, SavedIndicator::with_delay(delay))
    }

    fn with_indicator(store: Arc<dyn KeyValueStore>, indicator: SavedIndicator) -> Self {
        Self { store, indicator }
    }

    /// Reads the persisted preferences, using defaults for absent keys.
    ///
    /// Every key is decoded on its own.  A stored value of the wrong shape is
    /// logged and replaced by that key's default; the other keys keep their
    /// stored values.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Storage`] if the store read fails.
    pub async fn load(&self) -> Result<PreferenceSet, PreferencesError> {
        let defaults = PreferenceSet::default();
        let mut record = self.store.get(encode_record(&defaults)?).await?;

        let prefs = PreferenceSet {
            rules: take_field(&mut record, keys::RULES, defaults.rules),
            use_dynamic_mode: take_field(
                &mut record,
                keys::USE_DYNAMIC_MODE,
                defaults.use_dynamic_mode,
            ),
            dynamic_timeout_ms: take_field(
                &mut record,
                keys::DYNAMIC_TIMEOUT_MS,
                defaults.dynamic_timeout_ms,
            ),
            skip_pre_tags: take_field(&mut record, keys::SKIP_PRE_TAGS, defaults.skip_pre_tags),
            skip_code_tags: take_field(&mut record, keys::SKIP_CODE_TAGS, defaults.skip_code_tags),
        };
        info!(
            rules = prefs.rules.len(),
            dynamic = prefs.use_dynamic_mode,
            "preferences loaded"
        );
        Ok(prefs)
    }

    /// Commits `draft` as one whole-record overwrite and shows the saved indicator.
    ///
    /// Returns the [`PreferenceSet`] that was written.  Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Storage`] if the store write fails; the
    /// saved indicator is not shown in that case.
    pub async fn save(
        &mut self,
        draft: PreferenceDraft<'_>,
    ) -> Result<PreferenceSet, PreferencesError> {
        let dynamic_timeout_ms = match parse_dynamic_timeout(draft.dynamic_timeout_text) {
            Some(ms) => ms,
            None => {
                warn!(
                    text = draft.dynamic_timeout_text,
                    default = DEFAULT_DYNAMIC_TIMEOUT_MS,
                    "dynamic timeout is not a number, storing default"
                );
                DEFAULT_DYNAMIC_TIMEOUT_MS
            }
        };

        let prefs = PreferenceSet {
            rules: draft.rules.snapshot(),
            use_dynamic_mode: draft.use_dynamic_mode,
            dynamic_timeout_ms,
            skip_pre_tags: draft.skip_pre_tags,
            skip_code_tags: draft.skip_code_tags,
        };
        let dropped = draft.rules.len() - prefs.rules.len();
        if dropped > 0 {
            debug!(dropped, "skipping rows with an empty pattern");
        }

        self.store.set(encode_record(&prefs)?).await?;
        info!(rules = prefs.rules.len(), "preferences saved");

        self.indicator.show();
        Ok(prefs)
    }

    /// Serialises `rules` for the scratchpad buffer.
    pub fn export_text(&self, rules: &[Rule]) -> String {
        export_text(rules)
    }

    /// Parses a scratchpad buffer.  The caller adopts the rules and saves.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Import`] for malformed text.
    pub fn import_text(&self, text: &str) -> Result<Vec<Rule>, PreferencesError> {
        let rules = import_text(text)?;
        debug!(rules = rules.len(), "import buffer parsed");
        Ok(rules)
    }

    /// Returns `true` while the saved confirmation is showing.
    pub fn saved_visible(&self) -> bool {
        self.indicator.is_visible()
    }

    /// Returns a receiver that observes the saved confirmation.
    pub fn saved_signal(&self) -> watch::Receiver<bool> {
        self.indicator.subscribe()
    }
}

// ── Record helpers ────────────────────────────────────────────────────────────

fn encode_record(prefs: &PreferenceSet) -> Result<StorageRecord, StorageError> {
    let mut record = StorageRecord::new();
    record.insert(keys::RULES.to_string(), serde_json::to_value(&prefs.rules)?);
    record.insert(
        keys::USE_DYNAMIC_MODE.to_string(),
        Value::Bool(prefs.use_dynamic_mode),
    );
    record.insert(
        keys::DYNAMIC_TIMEOUT_MS.to_string(),
        Value::from(prefs.dynamic_timeout_ms),
    );
    record.insert(keys::SKIP_PRE_TAGS.to_string(), Value::Bool(prefs.skip_pre_tags));
    record.insert(keys::SKIP_CODE_TAGS.to_string(), Value::Bool(prefs.skip_code_tags));
    Ok(record)
}

/// Removes `key` from `record` and decodes it, falling back to `default`
/// when the key is absent or its value has the wrong shape.
fn take_field<T: DeserializeOwned>(
    record: &mut StorageRecord,
    key: &'static str,
    default: T,
) -> T {
    let Some(value) = record.remove(key) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(key, error = %e, "stored value has the wrong shape, using default");
            default
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
