//! OptionsPage: the user-facing editing session for rules and toggles.
//!
//! Every user action (button press, checkbox toggle, typing in a field) maps
//! to exactly one method here.  Structural edits touch only the in-memory
//! [`RuleListModel`]; nothing reaches storage until [`OptionsPage::save`] or
//! [`OptionsPage::import`] runs.
//!
//! # Lifecycle
//!
//! ```text
//! open()  ──►  add_row / edit_row / delete_row / move_up / move_to_top / clear
//!   │                         │
//!   │                       save()  ──►  store.set(..)  ──►  "saved" indicator
//!   │                         ▲
//!   └──── scratchpad ──► import()
//! ```
//!
//! The page always shows at least one row: after opening, importing, or
//! clearing, an empty list gets one blank row.  Blank rows are never written.

use tokio::sync::watch;
use tracing::{debug, info};
use wordswap_core::{PreferenceSet, Rule, RuleListModel};

use crate::application::preferences_store::{
    PreferenceDraft, PreferencesError, PreferencesStore,
};

/// In-memory state of the options page.
pub struct OptionsPage {
    store: PreferencesStore,
    rules: RuleListModel,
    use_dynamic_mode: bool,
    dynamic_timeout_text: String,
    skip_pre_tags: bool,
    skip_code_tags: bool,
    scratchpad: String,
}

impl OptionsPage {
    /// Loads persisted preferences and builds the page from them.
    ///
    /// A stored value of the wrong shape only resets that one setting; see
    /// [`PreferencesStore::load`].
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Storage`] when the store cannot be read.
    pub async fn open(store: PreferencesStore) -> Result<Self, PreferencesError> {
        let prefs = store.load().await?;
        Ok(Self::from_preferences(store, prefs))
    }

    fn from_preferences(store: PreferencesStore, prefs: PreferenceSet) -> Self {
        let scratchpad = store.export_text(&prefs.rules);
        let mut rules = RuleListModel::from_rules(prefs.rules);
        rules.ensure_row();
        Self {
            store,
            rules,
            use_dynamic_mode: prefs.use_dynamic_mode,
            dynamic_timeout_text: prefs.dynamic_timeout_ms.to_string(),
            skip_pre_tags: prefs.skip_pre_tags,
            skip_code_tags: prefs.skip_code_tags,
            scratchpad,
        }
    }

    // ── Rule rows ─────────────────────────────────────────────────────────────

    /// The rows as displayed, placeholders included.
    pub fn rules(&self) -> &RuleListModel {
        &self.rules
    }

    pub fn add_row(&mut self) {
        self.rules.append_empty();
        debug!(rows = self.rules.len(), "row added");
    }

    /// Applies the field values of the row at `position`.
    pub fn edit_row(&mut self, position: usize, rule: Rule) -> bool {
        self.rules.update_at(position, rule)
    }

    pub fn delete_row(&mut self, position: usize) -> Option<Rule> {
        let removed = self.rules.delete_at(position);
        if removed.is_some() {
            debug!(position, rows = self.rules.len(), "row deleted");
        }
        removed
    }

    pub fn move_up(&mut self, position: usize) -> bool {
        let moved = self.rules.promote_one(position);
        if moved {
            debug!(position, "row moved up");
        }
        moved
    }

    pub fn move_to_top(&mut self, position: usize) -> bool {
        let moved = self.rules.promote_to_top(position);
        if moved {
            debug!(position, "row moved to top");
        }
        moved
    }

    /// Empties the list and leaves one blank row.
    ///
    /// Clearing is not saved; call [`OptionsPage::save`] to persist it.
    pub fn clear(&mut self) {
        self.rules.replace_all(Vec::new());
        self.rules.ensure_row();
        info!("rule list cleared (not yet saved)");
    }

    // ── Global toggles ────────────────────────────────────────────────────────

    pub fn use_dynamic_mode(&self) -> bool {
        self.use_dynamic_mode
    }

    pub fn set_use_dynamic_mode(&mut self, on: bool) {
        self.use_dynamic_mode = on;
    }

    /// The timeout field is only offered while dynamic mode is on.
    pub fn dynamic_timeout_visible(&self) -> bool {
        self.use_dynamic_mode
    }

    pub fn dynamic_timeout_text(&self) -> &str {
        &self.dynamic_timeout_text
    }

    pub fn set_dynamic_timeout_text(&mut self, text: impl Into<String>) {
        self.dynamic_timeout_text = text.into();
    }

    pub fn skip_pre_tags(&self) -> bool {
        self.skip_pre_tags
    }

    pub fn set_skip_pre_tags(&mut self, on: bool) {
        self.skip_pre_tags = on;
    }

    pub fn skip_code_tags(&self) -> bool {
        self.skip_code_tags
    }

    pub fn set_skip_code_tags(&mut self, on: bool) {
        self.skip_code_tags = on;
    }

    // ── Scratchpad ────────────────────────────────────────────────────────────

    pub fn scratchpad(&self) -> &str {
        &self.scratchpad
    }

    pub fn set_scratchpad(&mut self, text: impl Into<String>) {
        self.scratchpad = text.into();
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Commits the current rows and toggles.
    ///
    /// On success the scratchpad shows the rules exactly as written.  The
    /// timeout field keeps the text the user typed.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Storage`] if the write fails; the page is
    /// left unchanged.
    pub async fn save(&mut self) -> Result<PreferenceSet, PreferencesError> {
        let draft = PreferenceDraft {
            rules: &self.rules,
            use_dynamic_mode: self.use_dynamic_mode,
            dynamic_timeout_text: &self.dynamic_timeout_text,
            skip_pre_tags: self.skip_pre_tags,
            skip_code_tags: self.skip_code_tags,
        };
        let saved = self.store.save(draft).await?;
        self.scratchpad = self.store.export_text(&saved.rules);
        Ok(saved)
    }

    /// Replaces every row with the rules parsed from the scratchpad, then saves.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Import`] for a malformed scratchpad, in which
    /// case the rows are untouched, or the error from [`OptionsPage::save`].
    pub async fn import(&mut self) -> Result<PreferenceSet, PreferencesError> {
        let imported = self.store.import_text(&self.scratchpad)?;
        info!(rules = imported.len(), "importing rules from scratchpad");
        self.rules.replace_all(imported);
        self.rules.ensure_row();
        self.save().await
    }

    /// Returns `true` while the saved confirmation is showing.
    pub fn saved_visible(&self) -> bool {
        self.store.saved_visible()
    }

    pub fn saved_signal(&self) -> watch::Receiver<bool> {
        self.store.saved_signal()
    }
}
