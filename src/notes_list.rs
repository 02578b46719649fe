//! List screen controller: owns the filter state, runs the list query and
//! carries out menu and per-row commands against the store.

use crate::database::{DatabaseError, NoteColumn, NoteStore, NoteValues};
use crate::filter::{self, CategoryFilter, DEFAULT_SORT_ORDER, FilterState, TodoFilter};
use crate::menu::{ContextAction, MenuCommand};
use crate::models::{EntryKind, Notice, NoteRecord, Priority, note_uri, now_millis, parse_note_uri};
use crate::presenter::{RowView, present_row};

/// Screen a list command asks the front end to move to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    TodoEditor(i64),
    NoteEditor(i64),
    /// Ask the user for a category, then call [`ListController::create_entry`]
    PickCategory(EntryKind),
    ManageCategories,
}

/// What the front end should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEffect {
    None,
    Notice(Notice),
    Navigate(Navigation),
    CopyToClipboard(String),
}

#[derive(Debug, Default)]
pub struct ListController {
    filter: FilterState,
    search_visible: bool,
    records: Vec<NoteRecord>,
}

impl ListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller for a fully specified filter, loaded with a single query.
    /// The search text is trimmed as if submitted.
    pub fn with_filter<S: NoteStore + ?Sized>(
        store: &S,
        mut filter: FilterState,
    ) -> Result<Self, DatabaseError> {
        filter.search_text = filter.search_text.trim().to_string();
        let mut list = Self {
            filter,
            ..Self::default()
        };
        list.refresh(store)?;
        Ok(list)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn records(&self) -> &[NoteRecord] {
        &self.records
    }

    pub fn record_at(&self, index: usize) -> Option<&NoteRecord> {
        self.records.get(index)
    }

    pub fn is_search_visible(&self) -> bool {
        self.search_visible
    }

    /// Compile the current filter and re-run the list query
    pub fn refresh<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<(), DatabaseError> {
        let predicate = filter::compile(&self.filter);
        self.records = store.query_predicate(&predicate, DEFAULT_SORT_ORDER)?;
        log::debug!(
            "event=list_refresh clauses={} rows={}",
            predicate.clauses.len(),
            self.records.len()
        );
        Ok(())
    }

    /// Present the fetched rows. Called on every render.
    pub fn present_rows<S: NoteStore + ?Sized>(&self, store: &S) -> Vec<RowView> {
        self.records
            .iter()
            .map(|record| present_row(store, record, &self.filter.search_text))
            .collect()
    }

    pub fn submit_search<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        text: &str,
    ) -> Result<(), DatabaseError> {
        self.filter.search_text = text.trim().to_string();
        self.refresh(store)
    }

    pub fn clear_search<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<(), DatabaseError> {
        self.filter.search_text.clear();
        self.refresh(store)
    }

    /// Show or hide the search bar. Hiding it drops an active search.
    pub fn toggle_search<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<(), DatabaseError> {
        if self.search_visible {
            self.search_visible = false;
            if !self.filter.search_text.is_empty() {
                self.clear_search(store)?;
            }
        } else {
            self.search_visible = true;
        }
        Ok(())
    }

    pub fn set_category_filter<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        category: CategoryFilter,
    ) -> Result<(), DatabaseError> {
        self.filter.category = category;
        self.refresh(store)
    }

    pub fn set_todo_filter<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        todo: TodoFilter,
    ) -> Result<(), DatabaseError> {
        self.filter.todo = todo;
        self.refresh(store)
    }

    /// Dispatch a menu command
    pub fn apply<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        command: MenuCommand,
    ) -> Result<ListEffect, DatabaseError> {
        log::debug!("event=menu_command command={:?}", command);
        match command {
            MenuCommand::AddNote => Ok(ListEffect::Navigate(Navigation::PickCategory(EntryKind::Note))),
            MenuCommand::AddTodo => Ok(ListEffect::Navigate(Navigation::PickCategory(EntryKind::Todo))),
            MenuCommand::ToggleSearch => {
                self.toggle_search(store)?;
                Ok(ListEffect::None)
            }
            MenuCommand::SubmitSearch(text) => {
                self.submit_search(store, &text)?;
                Ok(ListEffect::None)
            }
            MenuCommand::ClearSearch => {
                self.clear_search(store)?;
                Ok(ListEffect::None)
            }
            MenuCommand::ManageCategories => Ok(ListEffect::Navigate(Navigation::ManageCategories)),
            MenuCommand::FilterCategory(category) => {
                self.set_category_filter(store, category)?;
                Ok(ListEffect::None)
            }
            MenuCommand::FilterTodo(todo) => {
                self.set_todo_filter(store, todo)?;
                Ok(ListEffect::None)
            }
            MenuCommand::Paste(text) => Ok(match self.paste(store, &text) {
                Ok(id) => ListEffect::Navigate(Navigation::NoteEditor(id)),
                Err(notice) => ListEffect::Notice(notice),
            }),
        }
    }

    /// Insert a new note or todo filed under `category_id`.
    ///
    /// A failed insert is logged and returned as a user-facing notice; it is
    /// never retried.
    pub fn create_entry<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        kind: EntryKind,
        category_id: Option<i64>,
    ) -> Result<i64, Notice> {
        let values = new_entry_values(kind, category_id, now_millis());
        match store.insert_note(&values) {
            Ok(id) => {
                log::info!("event=entry_created kind={} id={}", kind.label(), id);
                if let Err(e) = self.refresh(store) {
                    log::error!("event=list_refresh_failed error={}", e);
                }
                Ok(id)
            }
            Err(e) => {
                log::error!("event=entry_create_failed kind={} error={}", kind.label(), e);
                Err(Notice::error(format!("Failed to create {}", kind.label())))
            }
        }
    }

    /// Create a plain note from clipboard text.
    ///
    /// A link made by the copy action duplicates that note's title, body and
    /// category. Any other text becomes the body of a note titled after its
    /// first line and filed under the category being filtered on.
    pub fn paste<S: NoteStore + ?Sized>(&mut self, store: &S, clipboard: &str) -> Result<i64, Notice> {
        let (title, body, category_id) = match parse_note_uri(clipboard) {
            Some(source_id) => match store.get_note(source_id) {
                Ok(Some(source)) => (source.title, source.body, source.category_id),
                Ok(None) => {
                    log::warn!("event=paste_source_missing id={}", source_id);
                    return Err(Notice::error("Copied note no longer exists"));
                }
                Err(e) => {
                    log::error!("event=paste_failed source={} error={}", source_id, e);
                    return Err(Notice::error("Failed to paste note"));
                }
            },
            None if clipboard.trim().is_empty() => return Err(Notice::info("Clipboard is empty")),
            None => (
                paste_title(clipboard),
                clipboard.to_string(),
                self.filter.category.id(),
            ),
        };

        let mut values = new_entry_values(EntryKind::Note, category_id, now_millis());
        values
            .put(NoteColumn::Title, title)
            .put(NoteColumn::Body, body);
        match store.insert_note(&values) {
            Ok(id) => {
                log::info!("event=entry_pasted id={}", id);
                if let Err(e) = self.refresh(store) {
                    log::error!("event=list_refresh_failed error={}", e);
                }
                Ok(id)
            }
            Err(e) => {
                log::error!("event=paste_failed error={}", e);
                Err(Notice::error("Failed to paste note"))
            }
        }
    }

    /// Run a per-row action. An index outside the current rows is treated as a
    /// malformed request: logged and ignored.
    pub fn context_action<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        row_index: usize,
        action: ContextAction,
    ) -> Result<ListEffect, DatabaseError> {
        let Some(record) = self.records.get(row_index) else {
            log::error!(
                "event=bad_row_selection row={} rows={} action={:?}",
                row_index,
                self.records.len(),
                action
            );
            return Ok(ListEffect::None);
        };
        let id = record.id;
        let is_todo = record.is_todo;

        match action {
            ContextAction::Open => Ok(ListEffect::Navigate(if is_todo {
                Navigation::TodoEditor(id)
            } else {
                Navigation::NoteEditor(id)
            })),
            ContextAction::Copy => Ok(ListEffect::CopyToClipboard(note_uri(id))),
            ContextAction::Delete => {
                store.delete_note(id)?;
                log::info!("event=entry_deleted id={}", id);
                self.refresh(store)?;
                Ok(ListEffect::Notice(Notice::info("Deleted")))
            }
            ContextAction::MarkComplete => self.set_completed(store, id, true).map(ListEffect::Notice),
            ContextAction::MarkIncomplete => {
                self.set_completed(store, id, false).map(ListEffect::Notice)
            }
        }
    }

    /// Flip the completion flag of one todo and re-query
    pub fn set_completed<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        id: i64,
        complete: bool,
    ) -> Result<Notice, DatabaseError> {
        store.update_note(id, &completion_values(complete, now_millis()))?;
        self.refresh(store)?;
        Ok(Notice::info(if complete {
            "Marked complete"
        } else {
            "Marked incomplete"
        }))
    }

    /// `<filter>[ - <category>][ - Search: <text>] (<n> items)`
    pub fn screen_title(&self) -> String {
        let mut title = self.filter.todo.title_label().to_string();
        if let CategoryFilter::Only { name, .. } = &self.filter.category {
            title.push_str(" - ");
            title.push_str(name);
        }
        if !self.filter.search_text.is_empty() {
            title.push_str(" - Search: ");
            title.push_str(&self.filter.search_text);
        }
        title.push_str(&format!(" ({} items)", self.records.len()));
        title
    }
}

const PASTE_TITLE_CHARS: usize = 30;

/// First non-blank line of pasted text, cut to a short title
fn paste_title(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            let title: String = line.chars().take(PASTE_TITLE_CHARS).collect();
            title.trim_end().to_string()
        })
        .unwrap_or_else(|| EntryKind::Note.default_title().to_string())
}

/// Column values for a completion toggle
pub fn completion_values(complete: bool, now: i64) -> NoteValues {
    let mut values = NoteValues::new();
    values
        .put_bool(NoteColumn::IsCompleted, complete)
        .put(NoteColumn::ModifiedAt, now);
    values
}

/// Column values for a freshly created note or todo
pub fn new_entry_values(kind: EntryKind, category_id: Option<i64>, now: i64) -> NoteValues {
    let mut values = NoteValues::new();
    match category_id {
        Some(id) => values.put(NoteColumn::CategoryId, id),
        None => values.put_null(NoteColumn::CategoryId),
    };
    match kind {
        EntryKind::Note => {
            values.put_bool(NoteColumn::IsTodo, false);
        }
        EntryKind::Todo => {
            values
                .put_bool(NoteColumn::IsTodo, true)
                .put_bool(NoteColumn::IsCompleted, false)
                .put(NoteColumn::Priority, Priority::Medium.as_i64());
        }
    }
    values
        .put(NoteColumn::CreatedAt, now)
        .put(NoteColumn::ModifiedAt, now)
        .put(NoteColumn::Title, kind.default_title().to_string())
        .put(NoteColumn::Body, String::new());
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[test]
    fn todo_defaults_are_incomplete_medium_priority() {
        let values = new_entry_values(EntryKind::Todo, Some(4), 99);
        assert_eq!(values.get(NoteColumn::IsTodo), Some(&1i64.into()));
        assert_eq!(values.get(NoteColumn::IsCompleted), Some(&0i64.into()));
        assert_eq!(values.get(NoteColumn::Priority), Some(&1i64.into()));
        assert_eq!(values.get(NoteColumn::CategoryId), Some(&4i64.into()));
        assert_eq!(values.get(NoteColumn::ModifiedAt), Some(&99i64.into()));
    }

    #[test]
    fn note_defaults_skip_todo_columns() {
        let values = new_entry_values(EntryKind::Note, None, 1);
        assert_eq!(values.get(NoteColumn::IsTodo), Some(&0i64.into()));
        assert!(!values.contains(NoteColumn::IsCompleted));
        assert!(!values.contains(NoteColumn::Priority));
    }

    #[test]
    fn screen_title_reflects_every_dimension() {
        let db = Database::open_in_memory().unwrap();
        let mut list = ListController::new();
        list.refresh(&db).unwrap();
        assert_eq!(list.screen_title(), "Notes (0 items)");

        list.set_todo_filter(&db, TodoFilter::IncompleteTodos).unwrap();
        list.set_category_filter(
            &db,
            CategoryFilter::Only {
                id: 1,
                name: "Work".to_string(),
            },
        )
        .unwrap();
        list.submit_search(&db, "  plan ").unwrap();
        assert_eq!(
            list.screen_title(),
            "Incomplete todos - Work - Search: plan (0 items)"
        );
    }

    #[test]
    fn filter_selection_keeps_search_text() {
        let db = Database::open_in_memory().unwrap();
        let mut list = ListController::new();
        list.submit_search(&db, "milk").unwrap();
        list.apply(&db, MenuCommand::FilterTodo(TodoFilter::TodosOnly))
            .unwrap();
        list.apply(&db, MenuCommand::FilterCategory(CategoryFilter::All))
            .unwrap();
        assert_eq!(list.filter().search_text, "milk");
    }

    #[test]
    fn hiding_search_bar_clears_active_search() {
        let db = Database::open_in_memory().unwrap();
        let mut list = ListController::new();
        list.apply(&db, MenuCommand::ToggleSearch).unwrap();
        assert!(list.is_search_visible());
        list.apply(&db, MenuCommand::SubmitSearch("x".to_string()))
            .unwrap();
        list.apply(&db, MenuCommand::ToggleSearch).unwrap();
        assert!(!list.is_search_visible());
        assert!(list.filter().search_text.is_empty());
    }

    #[test]
    fn pasted_text_becomes_a_note_titled_by_its_first_line() {
        let db = Database::open_in_memory().unwrap();
        let mut list = ListController::new();
        let text = "\n  Shopping list for the weekend trip to the coast\neggs\nbread";

        let effect = list.apply(&db, MenuCommand::Paste(text.to_string())).unwrap();
        let ListEffect::Navigate(Navigation::NoteEditor(id)) = effect else {
            panic!("expected the editor to open, got {:?}", effect);
        };
        let record = db.get_note(id).unwrap().unwrap();
        assert_eq!(record.title, "Shopping list for the weekend");
        assert_eq!(record.body, text);
        assert!(!record.is_todo);
        assert_eq!(list.records()[0].id, id);
    }

    #[test]
    fn pasted_link_duplicates_the_linked_note() {
        let db = Database::open_in_memory().unwrap();
        let work = db.insert_category("Work").unwrap();
        let mut list = ListController::new();
        let source = list.create_entry(&db, EntryKind::Todo, Some(work)).unwrap();
        let mut values = NoteValues::new();
        values
            .put(NoteColumn::Title, "Quarterly report".to_string())
            .put(NoteColumn::Body, "numbers go here".to_string());
        db.update_note(source, &values).unwrap();

        let copy = list.paste(&db, &note_uri(source)).unwrap();
        assert_ne!(copy, source);
        let record = db.get_note(copy).unwrap().unwrap();
        assert_eq!(record.title, "Quarterly report");
        assert_eq!(record.body, "numbers go here");
        assert_eq!(record.category_id, Some(work));
        assert!(!record.is_todo);
        assert_eq!(list.records().len(), 2);
    }

    #[test]
    fn paste_rejects_empty_text_and_dangling_links() {
        let db = Database::open_in_memory().unwrap();
        let mut list = ListController::new();
        assert_eq!(list.paste(&db, "  \n").unwrap_err().message, "Clipboard is empty");
        let notice = list.paste(&db, &note_uri(99)).unwrap_err();
        assert!(notice.is_error());
        assert!(list.records().is_empty());
    }

    #[test]
    fn full_filter_loads_with_one_query() {
        use crate::models::Category;
        use rusqlite::types::Value;
        use std::cell::Cell;

        struct CountingStore {
            inner: Database,
            queries: Cell<usize>,
        }

        impl NoteStore for CountingStore {
            fn query_notes(
                &self,
                selection: Option<&str>,
                args: &[Value],
                sort_order: &str,
            ) -> Result<Vec<NoteRecord>, DatabaseError> {
                self.queries.set(self.queries.get() + 1);
                self.inner.query_notes(selection, args, sort_order)
            }
            fn get_note(&self, id: i64) -> Result<Option<NoteRecord>, DatabaseError> {
                self.inner.get_note(id)
            }
            fn insert_note(&self, values: &NoteValues) -> Result<i64, DatabaseError> {
                self.inner.insert_note(values)
            }
            fn update_note(&self, id: i64, values: &NoteValues) -> Result<usize, DatabaseError> {
                self.inner.update_note(id, values)
            }
            fn delete_note(&self, id: i64) -> Result<usize, DatabaseError> {
                self.inner.delete_note(id)
            }
            fn find_category(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
                self.inner.find_category(id)
            }
            fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
                self.inner.list_categories()
            }
        }

        let store = CountingStore {
            inner: Database::open_in_memory().unwrap(),
            queries: Cell::new(0),
        };
        let work = store.inner.insert_category("Work").unwrap();
        let mut values = new_entry_values(EntryKind::Todo, Some(work), 5);
        values.put(NoteColumn::Title, "plan sprint".to_string());
        store.insert_note(&values).unwrap();

        let filter = FilterState {
            search_text: " plan ".to_string(),
            category: CategoryFilter::Only {
                id: work,
                name: "Work".to_string(),
            },
            todo: TodoFilter::IncompleteTodos,
        };
        let list = ListController::with_filter(&store, filter).unwrap();
        assert_eq!(store.queries.get(), 1);
        assert_eq!(list.records().len(), 1);
        assert_eq!(list.screen_title(), "Incomplete todos - Work - Search: plan (1 items)");
    }

    #[test]
    fn out_of_range_row_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        let mut list = ListController::new();
        list.refresh(&db).unwrap();
        let effect = list.context_action(&db, 3, ContextAction::Delete).unwrap();
        assert_eq!(effect, ListEffect::None);
    }
}
