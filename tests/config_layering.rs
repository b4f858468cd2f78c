//! Config files merged in priority order and fed into the shortcut table.

use std::fs;

use modeshell::domain::errors::ShortcutError;
use modeshell::domain::key::{EditAction, KeyCode, KeyModifiers};
use modeshell::infrastructure::config::load_from_paths;
use modeshell::interface::line_input::ShortcutTable;
use tempfile::tempdir;

#[test]
fn later_files_override_and_shortcuts_accumulate() {
    let dir = tempdir().unwrap();
    let system = dir.path().join("system.json");
    let project = dir.path().join("project.json");
    let missing = dir.path().join("missing.json");
    fs::write(
        &system,
        r#"{
            "defaults": {"title": "library", "history_limit": 10},
            "shortcuts": [{"key": "w", "modifiers": ["ctrl"], "action": "backspace_word"}]
        }"#,
    )
    .unwrap();
    fs::write(
        &project,
        r#"{
            "defaults": {"history_limit": 3, "startup_mode": "interactive"},
            "shortcuts": [{"key": "a", "modifiers": ["ctrl"], "action": "home"}]
        }"#,
    )
    .unwrap();

    let loaded = load_from_paths(vec![system.clone(), missing, project.clone()]).unwrap();
    assert_eq!(loaded.searched_paths.len(), 3);
    assert_eq!(loaded.loaded_paths, vec![system, project]);

    let config = loaded.config;
    assert_eq!(config.title(), "library");
    assert_eq!(config.history_limit(), 3);
    assert_eq!(config.startup_mode(), "interactive");

    let table = ShortcutTable::register(&[], &config.user_shortcuts().unwrap()).unwrap();
    assert_eq!(
        table.resolve(KeyCode::Char('w'), KeyModifiers::CONTROL),
        Some(EditAction::BackspaceWord)
    );
    assert_eq!(
        table.resolve(KeyCode::Char('a'), KeyModifiers::CONTROL),
        Some(EditAction::Home)
    );
    assert_eq!(
        table.resolve(KeyCode::Home, KeyModifiers::NONE),
        Some(EditAction::Home)
    );
}

#[test]
fn same_combination_in_two_files_is_rejected_at_registration() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let binding = r#"{"shortcuts": [{"key": "LeftArrow", "modifiers": ["alt"], "action": "word_left"}]}"#;
    fs::write(&first, binding).unwrap();
    fs::write(&second, binding).unwrap();

    let config = load_from_paths(vec![first, second]).unwrap().config;
    let err = ShortcutTable::register(&[], &config.user_shortcuts().unwrap()).unwrap_err();
    assert!(matches!(err, ShortcutError::Duplicate { .. }));
    assert!(err.to_string().contains("Alt+LeftArrow"));
}

#[test]
fn malformed_file_names_its_path() {
    let dir = tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();

    let err = load_from_paths(vec![broken]).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}
