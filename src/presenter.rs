//! Per-row formatting for the notes list.
//!
//! Rows are presented fresh on every render: completion state can change
//! without the row being recreated, so nothing here is cached.

use chrono::{Local, TimeZone};

use crate::database::NoteStore;
use crate::models::NoteRecord;

/// Longest body prefix shown in a row preview, in characters
pub const PREVIEW_MAX_CHARS: usize = 40;
pub const PREVIEW_ELLIPSIS: &str = "...";
pub const UNKNOWN_CATEGORY: &str = "Unknown category";
/// Opacity applied to the title of a completed todo
pub const COMPLETED_ALPHA: f32 = 0.6;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub strikethrough: bool,
    pub alpha: f32,
}

impl RowStyle {
    pub const NORMAL: RowStyle = RowStyle {
        strikethrough: false,
        alpha: 1.0,
    };

    pub const COMPLETED: RowStyle = RowStyle {
        strikethrough: true,
        alpha: COMPLETED_ALPHA,
    };

    pub fn for_record(record: &NoteRecord) -> Self {
        if record.is_completed_todo() {
            RowStyle::COMPLETED
        } else {
            RowStyle::NORMAL
        }
    }

    pub fn is_dimmed(&self) -> bool {
        self.alpha < 1.0
    }
}

/// Display fields for one list row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub timestamp: String,
    pub style: RowStyle,
}

/// Present one record. The category name is looked up against the store at
/// call time; a miss or a failed lookup falls back to [`UNKNOWN_CATEGORY`].
pub fn present_row<S: NoteStore + ?Sized>(
    store: &S,
    record: &NoteRecord,
    search_text: &str,
) -> RowView {
    let category_name = category_display_name(store, record.category_id);
    RowView {
        id: record.id,
        title: highlight(&record.title, search_text),
        preview: build_preview(&category_name, record),
        timestamp: format_timestamp(record.modified_at),
        style: RowStyle::for_record(record),
    }
}

/// Search-term highlighting hook. Returns the text unchanged.
pub fn highlight(text: &str, _query: &str) -> String {
    text.to_string()
}

/// Resolve a category name, never failing
pub fn category_display_name<S: NoteStore + ?Sized>(store: &S, category_id: Option<i64>) -> String {
    let Some(id) = category_id else {
        return UNKNOWN_CATEGORY.to_string();
    };
    match store.find_category(id) {
        Ok(Some(category)) => category.name,
        Ok(None) => UNKNOWN_CATEGORY.to_string(),
        Err(e) => {
            log::warn!("event=category_lookup_failed id={} error={}", id, e);
            UNKNOWN_CATEGORY.to_string()
        }
    }
}

/// `<category>[ | TODO[✓]] | <content preview>`
pub fn build_preview(category_name: &str, record: &NoteRecord) -> String {
    let mut text = category_name.to_string();
    if record.is_todo {
        text.push_str(" | TODO");
        if record.is_completed {
            text.push('✓');
        }
    }
    text.push_str(" | ");
    text.push_str(&content_preview(&record.body));
    text
}

/// Body truncated to [`PREVIEW_MAX_CHARS`] characters with a trailing ellipsis
pub fn content_preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_MAX_CHARS {
        let mut preview: String = body.chars().take(PREVIEW_MAX_CHARS).collect();
        preview.push_str(PREVIEW_ELLIPSIS);
        preview
    } else {
        body.to_string()
    }
}

/// Format epoch millis as `YYYY-MM-DD HH:mm` in the local time zone
pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, DatabaseError, NoteColumn, NoteValues};
    use crate::models::{Category, Priority};
    use chrono::Utc;

    fn record(body: &str, is_todo: bool, is_completed: bool) -> NoteRecord {
        NoteRecord {
            id: 1,
            title: "Title".to_string(),
            body: body.to_string(),
            category_id: None,
            is_todo,
            is_completed,
            due_date: None,
            priority: Priority::Medium,
            created_at: 0,
            modified_at: 0,
        }
    }

    #[test]
    fn preview_keeps_bodies_up_to_forty_chars() {
        let body = "a".repeat(40);
        assert_eq!(content_preview(&body), body);
        assert_eq!(content_preview(""), "");
    }

    #[test]
    fn preview_truncates_longer_bodies_once() {
        let body = "b".repeat(41);
        let preview = content_preview(&body);
        assert_eq!(preview, format!("{}...", "b".repeat(40)));
        assert_eq!(preview.matches("...").count(), 1);
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let body = "笔".repeat(45);
        let preview = content_preview(&body);
        assert_eq!(preview.chars().count(), 43);
        assert!(preview.starts_with(&"笔".repeat(40)));
    }

    #[test]
    fn preview_layout_for_notes_and_todos() {
        assert_eq!(build_preview("Work", &record("hello", false, false)), "Work | hello");
        assert_eq!(
            build_preview("Work", &record("hello", true, false)),
            "Work | TODO | hello"
        );
        assert_eq!(
            build_preview("Work", &record("", true, true)),
            "Work | TODO✓ | "
        );
    }

    #[test]
    fn completed_style_only_for_completed_todos() {
        assert_eq!(RowStyle::for_record(&record("", true, true)), RowStyle::COMPLETED);
        assert_eq!(RowStyle::for_record(&record("", true, false)), RowStyle::NORMAL);
        assert_eq!(RowStyle::for_record(&record("", false, true)), RowStyle::NORMAL);
        assert!(RowStyle::COMPLETED.is_dimmed());
        assert_eq!(RowStyle::COMPLETED.alpha, 0.6);
    }

    #[test]
    fn highlight_is_a_no_op() {
        assert_eq!(highlight("Groceries", "gro"), "Groceries");
        assert_eq!(highlight("", ""), "");
    }

    #[test]
    fn timestamp_uses_minute_precision() {
        // 2024-03-05 07:08:09 UTC
        assert_eq!(format_timestamp_in(1_709_622_489_000, &Utc), "2024-03-05 07:08");
    }

    #[test]
    fn category_lookup_degrades_to_placeholder() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_category("Home").unwrap();
        assert_eq!(category_display_name(&db, Some(id)), "Home");
        assert_eq!(category_display_name(&db, Some(id + 100)), UNKNOWN_CATEGORY);
        assert_eq!(category_display_name(&db, None), UNKNOWN_CATEGORY);
    }

    /// Store whose every call fails
    struct BrokenStore;

    fn broken() -> DatabaseError {
        DatabaseError::SqliteError(rusqlite::Error::InvalidQuery)
    }

    impl NoteStore for BrokenStore {
        fn query_notes(
            &self,
            _selection: Option<&str>,
            _args: &[rusqlite::types::Value],
            _sort_order: &str,
        ) -> Result<Vec<NoteRecord>, DatabaseError> {
            Err(broken())
        }
        fn get_note(&self, _id: i64) -> Result<Option<NoteRecord>, DatabaseError> {
            Err(broken())
        }
        fn insert_note(&self, _values: &NoteValues) -> Result<i64, DatabaseError> {
            Err(broken())
        }
        fn update_note(&self, _id: i64, _values: &NoteValues) -> Result<usize, DatabaseError> {
            Err(broken())
        }
        fn delete_note(&self, _id: i64) -> Result<usize, DatabaseError> {
            Err(broken())
        }
        fn find_category(&self, _id: i64) -> Result<Option<Category>, DatabaseError> {
            Err(broken())
        }
        fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
            Err(broken())
        }
    }

    #[test]
    fn failed_category_lookup_degrades_to_placeholder() {
        assert_eq!(category_display_name(&BrokenStore, Some(3)), UNKNOWN_CATEGORY);

        let mut note = record("body text", true, false);
        note.category_id = Some(3);
        let row = present_row(&BrokenStore, &note, "");
        assert_eq!(row.preview, format!("{} | TODO | body text", UNKNOWN_CATEGORY));
        assert_eq!(row.title, "Title");
    }

    #[test]
    fn present_row_recomputes_style_after_toggle() {
        let db = Database::open_in_memory().unwrap();
        let mut values = NoteValues::new();
        values
            .put(NoteColumn::Title, "Pay rent".to_string())
            .put_bool(NoteColumn::IsTodo, true)
            .put(NoteColumn::CreatedAt, 1i64)
            .put(NoteColumn::ModifiedAt, 1i64);
        let id = db.insert_note(&values).unwrap();

        for completed in [true, false, true] {
            let mut toggle = NoteValues::new();
            toggle.put_bool(NoteColumn::IsCompleted, completed);
            db.update_note(id, &toggle).unwrap();
            let note = db.get_note(id).unwrap().unwrap();
            let row = present_row(&db, &note, "");
            assert_eq!(row.style.strikethrough, completed);
            assert_eq!(row.style.is_dimmed(), completed);
        }
    }
}
