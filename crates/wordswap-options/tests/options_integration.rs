//! End-to-end tests: options page over real stores, reopened between steps.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;
use wordswap_core::{keys, Rule};
use wordswap_options::application::options_page::OptionsPage;
use wordswap_options::application::preferences_store::{PreferencesError, PreferencesStore};
use wordswap_options::infrastructure::storage::{JsonFileStore, MemoryStore};
use wordswap_options::infrastructure::ui_bridge::{self, AppState};

fn temp_store_path() -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("wordswap_it_{}", Uuid::new_v4()));
    let path = dir.join("preferences.json");
    (dir, path)
}

async fn open_over(store: Arc<MemoryStore>) -> OptionsPage {
    OptionsPage::open(PreferencesStore::new(store))
        .await
        .expect("memory store opens")
}

#[tokio::test]
async fn test_deleting_seed_rule_persists_empty_list_and_reopen_pads_one_row() {
    // Arrange
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(Arc::clone(&store)).await;
    assert_eq!(page.rules().snapshot(), vec![Rule::new("mispell", "misspell")]);

    // Act
    page.delete_row(0);
    page.save().await.expect("save");
    let reopened = open_over(Arc::clone(&store)).await;

    // Assert
    assert_eq!(store.entries().await[keys::RULES], json!([]));
    assert_eq!(reopened.rules().len(), 1);
    assert!(reopened.rules().get(0).unwrap().is_placeholder());
    assert!(reopened.rules().snapshot().is_empty());
    assert_eq!(store.entries().await[keys::RULES], json!([]), "padding is not persisted");
}

#[tokio::test]
async fn test_import_known_record_then_snapshot_yields_that_rule() {
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(Arc::clone(&store)).await;
    page.set_scratchpad(r#"[{"from":"a","to":"b","ic":true,"mw":false,"sc":false}]"#);

    page.import().await.expect("import");

    assert_eq!(
        page.rules().snapshot(),
        vec![Rule::new("a", "b").with_ignore_case(true)]
    );
    assert_eq!(
        store.entries().await[keys::RULES],
        json!([{"from": "a", "to": "b", "ic": true, "mw": false, "sc": false}])
    );
}

#[tokio::test]
async fn test_import_not_json_fails_and_leaves_snapshot_unchanged() {
    // Arrange
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(Arc::clone(&store)).await;
    let before = page.rules().snapshot();
    page.set_scratchpad("not json");

    // Act
    let result = page.import().await;

    // Assert
    assert!(matches!(result, Err(PreferencesError::Import(_))));
    assert_eq!(page.rules().snapshot(), before);
    assert!(store.entries().await.is_empty(), "nothing was written");
}

#[tokio::test]
async fn test_timeout_text_abc_persists_default_and_1500_persists_1500() {
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(Arc::clone(&store)).await;
    page.set_use_dynamic_mode(true);

    page.set_dynamic_timeout_text("abc");
    page.save().await.expect("save abc");
    assert_eq!(store.entries().await[keys::DYNAMIC_TIMEOUT_MS], json!(2000));

    page.set_dynamic_timeout_text("1500");
    page.save().await.expect("save 1500");
    assert_eq!(store.entries().await[keys::DYNAMIC_TIMEOUT_MS], json!(1500));
}

#[tokio::test]
async fn test_export_import_round_trip_through_scratchpad_preserves_order() {
    // Arrange
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(Arc::clone(&store)).await;
    let rules = vec![
        Rule::new("teh", "the"),
        Rule::new("recieve", "receive").with_whole_word(true),
        Rule::new("Colour", "Color").with_smart_case(true).with_ignore_case(true),
    ];
    for rule in &rules {
        page.add_row();
        let last = page.rules().len() - 1;
        page.edit_row(last, rule.clone());
    }
    page.delete_row(0);
    page.save().await.expect("save");
    let exported = page.scratchpad().to_string();

    // Act
    let mut other = open_over(Arc::new(MemoryStore::new())).await;
    other.set_scratchpad(exported);
    other.import().await.expect("import");

    // Assert
    assert_eq!(other.rules().snapshot(), rules);
}

#[tokio::test]
async fn test_clear_is_only_persisted_after_save() {
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(Arc::clone(&store)).await;
    page.save().await.expect("initial save");

    page.clear();
    let reopened = open_over(Arc::clone(&store)).await;
    assert_eq!(reopened.rules().snapshot().len(), 1, "clear alone is not saved");

    page.save().await.expect("save after clear");
    let reopened = open_over(Arc::clone(&store)).await;
    assert!(reopened.rules().snapshot().is_empty());
}

#[tokio::test]
async fn test_json_file_store_survives_reopen_with_all_keys() {
    // Arrange
    let (dir, path) = temp_store_path();
    let state = AppState::open(PreferencesStore::new(Arc::new(JsonFileStore::new(&path))))
        .await
        .expect("open");
    let settings = ui_bridge::get_settings(Arc::clone(&state)).await.data.unwrap();
    ui_bridge::update_settings(
        Arc::clone(&state),
        ui_bridge::SettingsDto {
            use_dynamic_mode: true,
            dynamic_timeout: "750".to_string(),
            skip_pre_tags: true,
            ..settings
        },
    )
    .await;

    // Act
    let saved = ui_bridge::save(Arc::clone(&state)).await;
    drop(state);
    let reopened = AppState::open(PreferencesStore::new(Arc::new(JsonFileStore::new(&path))))
        .await
        .expect("reopen");

    // Assert
    assert!(saved.success, "save failed: {:?}", saved.error);
    let settings = ui_bridge::get_settings(Arc::clone(&reopened)).await.data.unwrap();
    assert!(settings.use_dynamic_mode);
    assert_eq!(settings.dynamic_timeout, "750");
    assert!(settings.skip_pre_tags);
    assert!(!settings.skip_code_tags);
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    for key in keys::ALL {
        assert!(on_disk.get(key).is_some(), "missing key {key}");
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_corrupt_store_file_fails_to_open() {
    let (dir, path) = temp_store_path();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(&path, "{ truncated").unwrap();

    let store = PreferencesStore::new(Arc::new(JsonFileStore::new(&path)));

    let result = OptionsPage::open(store).await;

    assert!(matches!(result, Err(PreferencesError::Storage(_))));
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_bad_stored_timeout_keeps_rules_on_disk_after_unrelated_save() {
    // Arrange: a store file whose timeout is null
    let (dir, path) = temp_store_path();
    std::fs::create_dir_all(&dir).unwrap();
    let stored = json!({
        "rules": [{"from": "keep", "to": "me", "ic": true, "mw": false, "sc": false}],
        "dynamicTimeoutMs": null,
        "skipCodeTags": true
    });
    std::fs::write(&path, stored.to_string()).unwrap();
    let store = PreferencesStore::new(Arc::new(JsonFileStore::new(&path)));

    // Act
    let mut page = OptionsPage::open(store).await.expect("open");
    page.set_skip_pre_tags(true);
    page.save().await.expect("save");

    // Assert
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[keys::RULES], stored["rules"]);
    assert_eq!(on_disk[keys::DYNAMIC_TIMEOUT_MS], json!(2000));
    assert_eq!(on_disk[keys::SKIP_CODE_TAGS], json!(true));
    assert_eq!(on_disk[keys::SKIP_PRE_TAGS], json!(true));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test(start_paused = true)]
async fn test_rapid_saves_keep_indicator_visible_until_last_delay_elapses() {
    // Arrange
    let store = Arc::new(MemoryStore::new());
    let mut page = open_over(store).await;

    // Act
    page.save().await.expect("first save");
    tokio::time::sleep(Duration::from_millis(600)).await;
    page.save().await.expect("second save");
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Assert
    assert!(page.saved_visible(), "restarted timer has not fired yet");
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!page.saved_visible());
}

#[test]
fn test_open_from_synchronous_context() {
    let store = Arc::new(MemoryStore::with_entries(
        [(keys::SKIP_CODE_TAGS.to_string(), json!(true))]
            .into_iter()
            .collect(),
    ));

    let page = tokio_test::block_on(open_over(store));

    assert!(page.skip_code_tags());
    assert_eq!(page.rules().snapshot(), wordswap_core::seed_rules());
}
