use std::fs;

use tempfile::TempDir;

use notepad::cli::{self, CategoryCommand};
use notepad::todo_editor::TodoEditor;
use notepad::{Config, Database, NoteStore, Priority, Profile};

#[test]
fn notes_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("notepad.db");
    let path_str = path.to_str().unwrap();

    let id = {
        let db = Database::new(path_str).unwrap();
        let general = db.ensure_default_category("General").unwrap();
        assert!(general.is_some());
        let mut out = Vec::new();
        cli::handle_add_todo(
            "Renew passport".to_string(),
            Some("bring photos".to_string()),
            Some("general".to_string()),
            Some("2030-05-01".to_string()),
            Some("high".to_string()),
            &db,
            &mut out,
        )
        .unwrap()
    };

    let db = Database::new(path_str).unwrap();
    assert_eq!(db.ensure_default_category("General").unwrap(), None);
    let record = db.get_note(id).unwrap().unwrap();
    assert_eq!(record.title, "Renew passport");
    assert_eq!(record.priority, Priority::High);

    let editor = TodoEditor::open(&db, id).unwrap();
    assert_eq!(editor.due_date_display(), "2030-05-01");
}

#[test]
fn cli_round_trip_through_list_complete_and_json() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("notepad.db").to_str().unwrap()).unwrap();
    let mut out = Vec::new();

    cli::handle_category(CategoryCommand::Add { name: "Work".to_string() }, &db, &mut out).unwrap();
    let todo = cli::handle_add_todo(
        "Ship release".to_string(),
        None,
        Some("Work".to_string()),
        None,
        None,
        &db,
        &mut out,
    )
    .unwrap();
    cli::handle_add_note("Scratch".to_string(), None, None, &db, &mut out).unwrap();
    cli::handle_complete(todo, false, &db, &mut out).unwrap();

    let mut listed = Vec::new();
    cli::handle_list(None, None, "incomplete", true, &db, &mut listed).unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&listed).unwrap();
    assert_eq!(rows.as_array().map(|a| a.len()), Some(0));

    let mut listed = Vec::new();
    cli::handle_list(None, Some("work".to_string()), "todos", true, &db, &mut listed).unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&listed).unwrap();
    assert_eq!(rows[0]["title"], "Ship release");
    assert_eq!(rows[0]["category"], "Work");
    assert_eq!(rows[0]["is_completed"], true);

    let mut table = Vec::new();
    cli::handle_list(Some("scratch".to_string()), None, "all", false, &db, &mut table).unwrap();
    let table = String::from_utf8(table).unwrap();
    assert!(table.starts_with("Notes - Search: scratch (1 items)"));
}

#[test]
fn config_override_path_is_created_and_reused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    let config = Config::load(Some(&path), Profile::Dev).unwrap();
    assert!(path.exists());
    assert_eq!(config.key_bindings.quit, "q");

    let edited = fs::read_to_string(&path)
        .unwrap()
        .replace("log_level = \"info\"", "log_level = \"debug\"");
    fs::write(&path, edited).unwrap();
    let config = Config::load(Some(&path), Profile::Dev).unwrap();
    assert_eq!(config.log_level, "debug");
}
