//! Command bridge: exposes options-page operations to front ends.
//!
//! A front end (the CLI in `main.rs`, or a web/desktop shell) renders the rows
//! returned by [`get_rows`] and calls back with the row's current position for
//! every control.  The bridge never owns data; the [`OptionsPage`] behind
//! [`AppState`] is the single source of truth.
//!
//! # Data Transfer Objects (DTOs)
//!
//! [`RowDto`] and [`SettingsDto`] contain only JSON-serialisable fields so a
//! front end can consume them directly.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`, so every
//! response has the same shape: `{ success: bool, data: T | null, error: string | null }`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;
use wordswap_core::Rule;

use crate::application::options_page::OptionsPage;
use crate::application::preferences_store::{PreferencesError, PreferencesStore};

// ── Shared application state ──────────────────────────────────────────────────

/// State shared between command invocations.
///
/// The async mutex serialises commands, so row operations, saves and imports
/// never interleave.
pub struct AppState {
    pub page: Mutex<OptionsPage>,
}

impl AppState {
    /// Opens the options page over `store`.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Storage`] when the store cannot be read.
    pub async fn open(store: PreferencesStore) -> Result<Arc<Self>, PreferencesError> {
        let page = OptionsPage::open(store).await?;
        Ok(Arc::new(Self {
            page: Mutex::new(page),
        }))
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// One editable row: the rule fields plus the row's current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDto {
    pub position: usize,
    pub from: String,
    pub to: String,
    pub ignore_case: bool,
    pub whole_word: bool,
    pub smart_case: bool,
}

impl RowDto {
    fn from_rule(position: usize, rule: &Rule) -> Self {
        Self {
            position,
            from: rule.from.clone(),
            to: rule.to.clone(),
            ignore_case: rule.ignore_case,
            whole_word: rule.whole_word,
            smart_case: rule.smart_case,
        }
    }
}

impl From<RowDto> for Rule {
    fn from(row: RowDto) -> Self {
        Rule {
            from: row.from,
            to: row.to,
            ignore_case: row.ignore_case,
            whole_word: row.whole_word,
            smart_case: row.smart_case,
        }
    }
}

/// Global toggles as shown on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDto {
    pub use_dynamic_mode: bool,
    /// Raw timeout text; only meaningful while `use_dynamic_mode` is on.
    pub dynamic_timeout: String,
    pub skip_pre_tags: bool,
    pub skip_code_tags: bool,
}

/// Outcome of a save or import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummaryDto {
    pub rules_saved: usize,
    pub dynamic_timeout_ms: u64,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Row commands ──────────────────────────────────────────────────────────────

/// Returns every row in display order, placeholders included.
pub async fn get_rows(state: Arc<AppState>) -> CommandResult<Vec<RowDto>> {
    let page = state.page.lock().await;
    let rows = page
        .rules()
        .iter()
        .enumerate()
        .map(|(position, rule)| RowDto::from_rule(position, rule))
        .collect();
    CommandResult::ok(rows)
}

/// Appends a filled-in row and returns its position.
pub async fn append_rule(state: Arc<AppState>, row: RowDto) -> CommandResult<usize> {
    let mut page = state.page.lock().await;
    page.add_row();
    let position = page.rules().len() - 1;
    page.edit_row(position, row.into());
    CommandResult::ok(position)
}

/// Writes the field values of `row` to the row at `row.position`.
pub async fn update_row(state: Arc<AppState>, row: RowDto) -> CommandResult<()> {
    let mut page = state.page.lock().await;
    let position = row.position;
    if page.edit_row(position, row.into()) {
        CommandResult::ok(())
    } else {
        CommandResult::err(format!("no row at position {position}"))
    }
}

/// Deletes the row at `position`.  Returns whether a row was removed.
pub async fn delete_row(state: Arc<AppState>, position: usize) -> CommandResult<bool> {
    let mut page = state.page.lock().await;
    CommandResult::ok(page.delete_row(position).is_some())
}

/// Moves the row at `position` up one step.  Returns whether it moved.
pub async fn move_row_up(state: Arc<AppState>, position: usize) -> CommandResult<bool> {
    let mut page = state.page.lock().await;
    CommandResult::ok(page.move_up(position))
}

/// Moves the row at `position` to the top.  Returns whether it moved.
pub async fn move_row_to_top(state: Arc<AppState>, position: usize) -> CommandResult<bool> {
    let mut page = state.page.lock().await;
    CommandResult::ok(page.move_to_top(position))
}

/// Empties the list, leaving one blank row.  Does not save.
pub async fn clear_rules(state: Arc<AppState>) -> CommandResult<()> {
    let mut page = state.page.lock().await;
    page.clear();
    CommandResult::ok(())
}

// ── Settings commands ─────────────────────────────────────────────────────────

pub async fn get_settings(state: Arc<AppState>) -> CommandResult<SettingsDto> {
    let page = state.page.lock().await;
    CommandResult::ok(SettingsDto {
        use_dynamic_mode: page.use_dynamic_mode(),
        dynamic_timeout: page.dynamic_timeout_text().to_string(),
        skip_pre_tags: page.skip_pre_tags(),
        skip_code_tags: page.skip_code_tags(),
    })
}

/// Applies all toggles and the timeout text.  Does not save.
pub async fn update_settings(state: Arc<AppState>, settings: SettingsDto) -> CommandResult<()> {
    let mut page = state.page.lock().await;
    page.set_use_dynamic_mode(settings.use_dynamic_mode);
    page.set_dynamic_timeout_text(settings.dynamic_timeout);
    page.set_skip_pre_tags(settings.skip_pre_tags);
    page.set_skip_code_tags(settings.skip_code_tags);
    CommandResult::ok(())
}

// ── Scratchpad and persistence commands ───────────────────────────────────────

pub async fn get_scratchpad(state: Arc<AppState>) -> CommandResult<String> {
    let page = state.page.lock().await;
    CommandResult::ok(page.scratchpad().to_string())
}

pub async fn set_scratchpad(state: Arc<AppState>, text: String) -> CommandResult<()> {
    let mut page = state.page.lock().await;
    page.set_scratchpad(text);
    CommandResult::ok(())
}

/// Commits the current rows and toggles.
pub async fn save(state: Arc<AppState>) -> CommandResult<SaveSummaryDto> {
    let mut page = state.page.lock().await;
    match page.save().await {
        Ok(saved) => CommandResult::ok(SaveSummaryDto {
            rules_saved: saved.rules.len(),
            dynamic_timeout_ms: saved.dynamic_timeout_ms,
        }),
        Err(e) => {
            warn!(error = %e, "save failed");
            CommandResult::err(format!("failed to save preferences: {e}"))
        }
    }
}

/// Replaces the rows with the scratchpad contents and saves.
pub async fn import_scratchpad(state: Arc<AppState>) -> CommandResult<SaveSummaryDto> {
    let mut page = state.page.lock().await;
    match page.import().await {
        Ok(saved) => CommandResult::ok(SaveSummaryDto {
            rules_saved: saved.rules.len(),
            dynamic_timeout_ms: saved.dynamic_timeout_ms,
        }),
        Err(e) => {
            warn!(error = %e, "import failed");
            CommandResult::err(format!("failed to import rules: {e}"))
        }
    }
}

/// Returns whether the saved confirmation is currently showing.
pub async fn get_saved_visible(state: Arc<AppState>) -> CommandResult<bool> {
    let page = state.page.lock().await;
    CommandResult::ok(page.saved_visible())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;

    /// Creates state over an empty in-memory store so tests never touch disk.
    async fn make_state() -> Arc<AppState> {
        AppState::open(PreferencesStore::new(Arc::new(MemoryStore::new())))
            .await
            .expect("memory store opens")
    }

    fn row(position: usize, from: &str, to: &str) -> RowDto {
        RowDto {
            position,
            from: from.to_string(),
            to: to.to_string(),
            ignore_case: false,
            whole_word: false,
            smart_case: false,
        }
    }

    #[tokio::test]
    async fn test_get_rows_returns_seed_rule_initially() {
        // Arrange
        let state = make_state().await;

        // Act
        let result = get_rows(state).await;

        // Assert
        assert!(result.success);
        let rows = result.data.unwrap();
        assert_eq!(rows, vec![row(0, "mispell", "misspell")]);
    }

    #[tokio::test]
    async fn test_append_rule_then_move_to_top() {
        let state = make_state().await;

        let position = append_rule(Arc::clone(&state), row(0, "teh", "the")).await;
        let moved = move_row_to_top(Arc::clone(&state), position.data.unwrap()).await;

        assert!(moved.data.unwrap());
        let rows = get_rows(state).await.data.unwrap();
        assert_eq!(rows[0].from, "teh");
        assert_eq!(rows[1].from, "mispell");
        assert_eq!(rows[0].position, 0);
    }

    #[tokio::test]
    async fn test_move_row_up_at_top_reports_no_move() {
        let state = make_state().await;

        let result = move_row_up(state, 0).await;

        assert!(result.success);
        assert!(!result.data.unwrap());
    }

    #[tokio::test]
    async fn test_update_row_out_of_range_fails() {
        let state = make_state().await;

        let result = update_row(state, row(9, "x", "y")).await;

        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_delete_row_out_of_range_reports_false() {
        let state = make_state().await;

        let result = delete_row(Arc::clone(&state), 3).await;

        assert!(result.success);
        assert!(!result.data.unwrap());
        assert_eq!(get_rows(state).await.data.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_reports_parsed_timeout() {
        // Arrange
        let state = make_state().await;
        update_settings(
            Arc::clone(&state),
            SettingsDto {
                use_dynamic_mode: true,
                dynamic_timeout: "1500".to_string(),
                skip_pre_tags: false,
                skip_code_tags: true,
            },
        )
        .await;

        // Act
        let result = save(Arc::clone(&state)).await;

        // Assert
        assert!(result.success, "save failed: {:?}", result.error);
        let summary = result.data.unwrap();
        assert_eq!(summary.dynamic_timeout_ms, 1500);
        assert_eq!(summary.rules_saved, 1);
        assert!(get_saved_visible(state).await.data.unwrap());
    }

    #[tokio::test]
    async fn test_import_scratchpad_with_bad_text_returns_error() {
        let state = make_state().await;
        set_scratchpad(Arc::clone(&state), "{".to_string()).await;

        let result = import_scratchpad(Arc::clone(&state)).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("import"));
        assert_eq!(get_rows(state).await.data.unwrap()[0].from, "mispell");
    }

    #[tokio::test]
    async fn test_clear_rules_leaves_single_blank_row() {
        let state = make_state().await;

        clear_rules(Arc::clone(&state)).await;

        let rows = get_rows(state).await.data.unwrap();
        assert_eq!(rows, vec![row(0, "", "")]);
    }

    #[test]
    fn test_command_result_ok_sets_success_true() {
        let r: CommandResult<i32> = CommandResult::ok(42);
        assert!(r.success);
        assert_eq!(r.data.unwrap(), 42);
        assert!(r.error.is_none());
    }

    #[test]
    fn test_command_result_err_sets_success_false() {
        let r: CommandResult<i32> = CommandResult::err("something went wrong");
        assert!(!r.success);
        assert!(r.data.is_none());
        assert_eq!(r.error.unwrap(), "something went wrong");
    }
}
