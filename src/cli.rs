use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

use crate::database::{Database, DatabaseError, NoteColumn, NoteStore};
use crate::filter::{CategoryFilter, FilterState, TodoFilter};
use crate::models::{Category, EntryKind, NoteRecord, Priority, now_millis};
use crate::notes_list::{ListController, completion_values, new_entry_values};
use crate::presenter::category_display_name;
use crate::todo_editor::due_date_millis;
use crate::utils::parse_date;

#[derive(Parser)]
#[command(name = "notepad")]
#[command(about = "Notes and todos with categories, search and filters")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a new note
    AddNote {
        /// Note title
        title: String,
        /// Note body
        #[arg(long)]
        body: Option<String>,
        /// Category name
        #[arg(long)]
        category: Option<String>,
    },
    /// Quickly add a new todo
    AddTodo {
        /// Todo title
        title: String,
        /// Todo description
        #[arg(long)]
        body: Option<String>,
        /// Category name
        #[arg(long)]
        category: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
    },
    /// List notes and todos, newest first
    List {
        /// Match title or body
        #[arg(long)]
        search: Option<String>,
        /// Only this category (by name)
        #[arg(long)]
        category: Option<String>,
        /// all, notes, todos or incomplete
        #[arg(long, default_value = "all")]
        filter: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Mark a todo complete
    Complete {
        id: i64,
        /// Mark it incomplete instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a note or todo
    Delete { id: i64 },
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Create a category
    Add { name: String },
    /// List categories in creation order
    List,
    /// Rename a category
    Rename { id: i64, name: String },
    /// Delete a category; its notes become uncategorized
    Delete { id: i64 },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Unknown priority '{0}' (expected low, medium or high)")]
    InvalidPriority(String),
    #[error("Unknown filter '{0}' (expected all, notes, todos or incomplete)")]
    InvalidFilter(String),
    #[error("No category named '{0}'")]
    CategoryNotFound(String),
    #[error("No category with ID {0}")]
    CategoryIdNotFound(i64),
    #[error("No note with ID {0}")]
    NoteNotFound(i64),
    #[error("Note {0} is not a todo")]
    NotATodo(i64),
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row of `list --json`
#[derive(Debug, Serialize)]
struct ListedNote<'a> {
    #[serde(flatten)]
    record: &'a NoteRecord,
    category: String,
}

/// Resolve a category by name, ignoring case
fn resolve_category(db: &Database, name: &str) -> Result<Category, CliError> {
    let wanted = name.trim();
    db.list_categories()?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CliError::CategoryNotFound(wanted.to_string()))
}

fn resolve_category_id(db: &Database, name: Option<&str>) -> Result<Option<i64>, CliError> {
    name.map(|name| resolve_category(db, name).map(|c| c.id))
        .transpose()
}

/// Handle the add-note command
pub fn handle_add_note(
    title: String,
    body: Option<String>,
    category: Option<String>,
    db: &Database,
    out: &mut impl Write,
) -> Result<i64, CliError> {
    let category_id = resolve_category_id(db, category.as_deref())?;
    let mut values = new_entry_values(EntryKind::Note, category_id, now_millis());
    values
        .put(NoteColumn::Title, title)
        .put(NoteColumn::Body, body.unwrap_or_default());

    let id = db.insert_note(&values)?;
    log::info!("event=cli_add kind=note id={}", id);
    writeln!(out, "Note created successfully (ID: {})", id)?;
    Ok(id)
}

/// Handle the add-todo command
pub fn handle_add_todo(
    title: String,
    body: Option<String>,
    category: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    db: &Database,
    out: &mut impl Write,
) -> Result<i64, CliError> {
    let due_date = due
        .map(|due_str| {
            parse_date(&due_str)
                .map(due_date_millis)
                .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e)))
        })
        .transpose()?;
    let priority = priority
        .map(|p| Priority::parse(&p).ok_or(CliError::InvalidPriority(p)))
        .transpose()?
        .unwrap_or_default();
    let category_id = resolve_category_id(db, category.as_deref())?;

    let mut values = new_entry_values(EntryKind::Todo, category_id, now_millis());
    values
        .put(NoteColumn::Title, title)
        .put(NoteColumn::Body, body.unwrap_or_default())
        .put(NoteColumn::Priority, priority.as_i64());
    if let Some(millis) = due_date {
        values.put(NoteColumn::DueDate, millis);
    }

    let id = db.insert_note(&values)?;
    log::info!("event=cli_add kind=todo id={}", id);
    writeln!(out, "Todo created successfully (ID: {})", id)?;
    Ok(id)
}

/// Handle the list command
pub fn handle_list(
    search: Option<String>,
    category: Option<String>,
    filter: &str,
    json: bool,
    db: &Database,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let todo_filter =
        TodoFilter::parse(filter).ok_or_else(|| CliError::InvalidFilter(filter.to_string()))?;
    let category_filter = match category.as_deref() {
        Some(name) => {
            let category = resolve_category(db, name)?;
            CategoryFilter::Only {
                id: category.id,
                name: category.name,
            }
        }
        None => CategoryFilter::All,
    };

    let list = ListController::with_filter(
        db,
        FilterState {
            search_text: search.unwrap_or_default(),
            category: category_filter,
            todo: todo_filter,
        },
    )?;

    if json {
        let rows: Vec<ListedNote> = list
            .records()
            .iter()
            .map(|record| ListedNote {
                record,
                category: category_display_name(db, record.category_id),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", list.screen_title())?;
    for row in list.present_rows(db) {
        let marker = if row.style.strikethrough { "x" } else { " " };
        writeln!(
            out,
            "[{}] {:>4}  {}  {}  {}",
            marker, row.id, row.timestamp, row.title, row.preview
        )?;
    }
    Ok(())
}

/// Handle the complete command
pub fn handle_complete(id: i64, undo: bool, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    let note = db.get_note(id)?.ok_or(CliError::NoteNotFound(id))?;
    if !note.is_todo {
        return Err(CliError::NotATodo(id));
    }
    db.update_note(id, &completion_values(!undo, now_millis()))?;
    log::info!("event=cli_complete id={} complete={}", id, !undo);
    if undo {
        writeln!(out, "Marked incomplete: {}", note.title)?;
    } else {
        writeln!(out, "Marked complete: {}", note.title)?;
    }
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(id: i64, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    if db.delete_note(id)? == 0 {
        return Err(CliError::NoteNotFound(id));
    }
    log::info!("event=cli_delete id={}", id);
    writeln!(out, "Deleted note {}", id)?;
    Ok(())
}

/// Handle the category subcommands
pub fn handle_category(command: CategoryCommand, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        CategoryCommand::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::EmptyName);
            }
            let id = db.insert_category(name)?;
            writeln!(out, "Category created successfully (ID: {})", id)?;
        }
        CategoryCommand::List => {
            for category in db.list_categories()? {
                let count = db.count_notes_in_category(category.id)?;
                writeln!(out, "{:>4}  {}  ({} notes)", category.id, category.name, count)?;
            }
        }
        CategoryCommand::Rename { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::EmptyName);
            }
            if db.rename_category(id, name)? == 0 {
                return Err(CliError::CategoryIdNotFound(id));
            }
            writeln!(out, "Category {} renamed to {}", id, name)?;
        }
        CategoryCommand::Delete { id } => {
            if db.delete_category(id)? == 0 {
                return Err(CliError::CategoryIdNotFound(id));
            }
            writeln!(out, "Category {} deleted", id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_list(db: &Database, filter: &str, json: bool) -> String {
        let mut out = Vec::new();
        handle_list(None, None, filter, json, db, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_todo_parses_due_date_and_priority() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        let id = handle_add_todo(
            "Taxes".to_string(),
            None,
            None,
            Some("2025-04-15".to_string()),
            Some("high".to_string()),
            &db,
            &mut out,
        )
        .unwrap();
        let note = db.get_note(id).unwrap().unwrap();
        assert!(note.is_todo);
        assert_eq!(note.priority, Priority::High);
        assert!(note.due_date.is_some());
    }

    #[test]
    fn add_todo_rejects_bad_input() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            handle_add_todo("x".into(), None, None, Some("soon".into()), None, &db, &mut out),
            Err(CliError::DateParseError(_))
        ));
        assert!(matches!(
            handle_add_todo("x".into(), None, None, None, Some("urgent".into()), &db, &mut out),
            Err(CliError::InvalidPriority(_))
        ));
        assert!(matches!(
            handle_add_note("x".into(), None, Some("Nowhere".into()), &db, &mut out),
            Err(CliError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn complete_then_list_incomplete_excludes_it() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        let id = handle_add_todo("Call mom".into(), None, None, None, None, &db, &mut out).unwrap();
        handle_complete(id, false, &db, &mut out).unwrap();

        let listing = run_list(&db, "incomplete", false);
        assert!(listing.starts_with("Incomplete todos (0 items)"));
        assert!(!listing.contains("Call mom"));
    }

    #[test]
    fn complete_rejects_plain_notes() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        let id = handle_add_note("Idea".into(), None, None, &db, &mut out).unwrap();
        assert!(matches!(
            handle_complete(id, false, &db, &mut out),
            Err(CliError::NotATodo(_))
        ));
    }

    #[test]
    fn list_json_includes_category_name() {
        let db = Database::open_in_memory().unwrap();
        db.insert_category("Work").unwrap();
        let mut out = Vec::new();
        handle_add_note("Standup".into(), Some("notes".into()), Some("work".into()), &db, &mut out)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&run_list(&db, "all", true)).unwrap();
        assert_eq!(json[0]["title"], "Standup");
        assert_eq!(json[0]["category"], "Work");
        assert_eq!(json[0]["is_todo"], false);
    }

    #[test]
    fn list_search_matches_renamed_titles() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        let id = handle_add_note("draft".into(), None, None, &db, &mut out).unwrap();
        let mut values = crate::database::NoteValues::new();
        values.put(NoteColumn::Title, "Quarterly report".to_string());
        db.update_note(id, &values).unwrap();

        let mut out = Vec::new();
        handle_list(Some(" report ".into()), None, "all", false, &db, &mut out).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("Quarterly report"));
        assert!(listing.starts_with("Notes - Search: report (1 items)"));
    }

    #[test]
    fn delete_of_missing_note_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            handle_delete(99, &db, &mut out),
            Err(CliError::NoteNotFound(99))
        ));
    }

    #[test]
    fn category_commands_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let mut out = Vec::new();
        handle_category(CategoryCommand::Add { name: "Home".into() }, &db, &mut out).unwrap();
        let id = db.list_categories().unwrap()[0].id;
        handle_category(
            CategoryCommand::Rename {
                id,
                name: "House".into(),
            },
            &db,
            &mut out,
        )
        .unwrap();
        assert_eq!(db.find_category(id).unwrap().unwrap().name, "House");
        handle_category(CategoryCommand::Delete { id }, &db, &mut out).unwrap();
        assert!(matches!(
            handle_category(CategoryCommand::Delete { id }, &db, &mut out),
            Err(CliError::CategoryIdNotFound(_))
        ));
        assert!(matches!(
            handle_category(CategoryCommand::Add { name: "  ".into() }, &db, &mut out),
            Err(CliError::EmptyName)
        ));
    }
}
