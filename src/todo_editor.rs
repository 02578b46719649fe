//! Editor for a single note or todo.
//!
//! The editor moves `Loading -> Ready -> (Saved | Deleted)`. Leaving the
//! editor by any route other than delete writes the working set back, so the
//! front end never has to ask "save changes?". [`EditorSession`] ties that
//! exit-save to scope: dropping the session saves unless it was closed
//! explicitly or the record was deleted.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use thiserror::Error;

use crate::database::{DatabaseError, NoteColumn, NoteStore, NoteValues};
use crate::models::{Notice, NoteRecord, Priority, now_millis};

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Note {0} not found")]
    NotFound(i64),
    #[error("Cannot {action} while the editor is {state:?}")]
    InvalidState {
        action: &'static str,
        state: EditorState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Loading,
    Ready,
    Saved,
    Deleted,
}

/// Which columns the editor owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    /// Title and body only
    Note,
    /// Title, body, completion, priority and due date
    Todo,
}

impl EditorKind {
    fn noun(self) -> &'static str {
        match self {
            EditorKind::Note => "Note",
            EditorKind::Todo => "Todo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TodoEditor {
    id: i64,
    kind: EditorKind,
    state: EditorState,
    has_been_deleted: bool,
    title: String,
    body: String,
    category_id: Option<i64>,
    is_completed: bool,
    /// `None` until a priority resolves; saved as medium in that case
    priority: Option<Priority>,
    /// Epoch millis of the chosen due date
    due_date: Option<i64>,
}

impl TodoEditor {
    /// Load record `id` into a fresh working set.
    ///
    /// The kind follows the record: todos open as [`EditorKind::Todo`],
    /// everything else as [`EditorKind::Note`].
    pub fn open<S: NoteStore + ?Sized>(store: &S, id: i64) -> Result<Self, EditorError> {
        let mut editor = TodoEditor {
            id,
            kind: EditorKind::Note,
            state: EditorState::Loading,
            has_been_deleted: false,
            title: String::new(),
            body: String::new(),
            category_id: None,
            is_completed: false,
            priority: None,
            due_date: None,
        };
        let record = store.get_note(id)?.ok_or(EditorError::NotFound(id))?;
        editor.populate(record);
        log::debug!("event=editor_open id={} kind={:?}", id, editor.kind);
        Ok(editor)
    }

    fn populate(&mut self, record: NoteRecord) {
        self.kind = if record.is_todo {
            EditorKind::Todo
        } else {
            EditorKind::Note
        };
        self.title = record.title;
        self.body = record.body;
        self.category_id = record.category_id;
        self.is_completed = record.is_completed;
        self.priority = Some(record.priority);
        self.due_date = record.due_date.filter(|d| *d > 0);
        self.state = EditorState::Ready;
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn has_been_deleted(&self) -> bool {
        self.has_been_deleted
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn priority_selection(&self) -> Option<Priority> {
        self.priority
    }

    /// The priority a save would write
    pub fn resolved_priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    pub fn due_date(&self) -> Option<i64> {
        self.due_date
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.touch();
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.is_completed = completed;
        self.touch();
    }

    pub fn toggle_completed(&mut self) {
        self.set_completed(!self.is_completed);
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
        self.touch();
    }

    /// Step to the next priority, wrapping from high back to low
    pub fn cycle_priority(&mut self) {
        let next = match self.resolved_priority() {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        };
        self.set_priority(Some(next));
    }

    /// Date picker result. The picker can only move to a concrete date; there
    /// is no way back to "no due date" once one is set.
    pub fn pick_due_date(&mut self, date: NaiveDate) {
        self.due_date = Some(due_date_millis(date));
        self.touch();
    }

    /// Due date as `YYYY-MM-DD`, empty when unset
    pub fn due_date_display(&self) -> String {
        self.due_date
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .map(|dt| dt.format(DUE_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Date to preselect in the picker: the current due date or today
    pub fn due_date_or_today(&self) -> NaiveDate {
        self.due_date
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .map(|dt| dt.date_naive())
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// An edit after a save makes the working set dirty again
    fn touch(&mut self) {
        if self.state == EditorState::Saved {
            self.state = EditorState::Ready;
        }
    }

    /// Column values written by a save
    pub fn build_save_values(&self, now: i64) -> NoteValues {
        let mut values = NoteValues::new();
        values
            .put(NoteColumn::Title, self.title.clone())
            .put(NoteColumn::Body, self.body.clone());
        if self.kind == EditorKind::Todo {
            values
                .put_bool(NoteColumn::IsTodo, true)
                .put_bool(NoteColumn::IsCompleted, self.is_completed);
        }
        values.put(NoteColumn::ModifiedAt, now);
        if self.kind == EditorKind::Todo {
            values.put(NoteColumn::Priority, self.resolved_priority().as_i64());
            match self.due_date {
                Some(millis) => values.put(NoteColumn::DueDate, millis),
                None => values.put_null(NoteColumn::DueDate),
            };
        }
        values
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), EditorError> {
        match self.state {
            EditorState::Ready | EditorState::Saved => Ok(()),
            state => Err(EditorError::InvalidState { action, state }),
        }
    }

    /// Write the working set back to the store.
    ///
    /// On failure the editor stays `Ready` and the error is returned to the
    /// caller; nothing is retried.
    pub fn save<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<Notice, EditorError> {
        self.ensure_editable("save")?;
        let values = self.build_save_values(now_millis());
        let changed = match store.update_note(self.id, &values) {
            Ok(changed) => changed,
            Err(e) => {
                log::error!("event=editor_save_failed id={} error={}", self.id, e);
                self.state = EditorState::Ready;
                return Err(e.into());
            }
        };
        if changed == 0 {
            log::error!("event=editor_save_failed id={} error=not_found", self.id);
            self.state = EditorState::Ready;
            return Err(EditorError::NotFound(self.id));
        }
        self.state = EditorState::Saved;
        log::info!("event=editor_saved id={} kind={:?}", self.id, self.kind);
        Ok(Notice::info(format!("{} saved", self.kind.noun())))
    }

    /// Remove the record. No confirmation happens here; that is the front
    /// end's call. After a successful delete the exit-save is suppressed.
    pub fn delete<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<Notice, EditorError> {
        self.ensure_editable("delete")?;
        if let Err(e) = store.delete_note(self.id) {
            log::error!("event=editor_delete_failed id={} error={}", self.id, e);
            self.state = EditorState::Ready;
            return Err(e.into());
        }
        self.has_been_deleted = true;
        self.state = EditorState::Deleted;
        log::info!("event=editor_deleted id={}", self.id);
        Ok(Notice::info(format!("{} deleted", self.kind.noun())))
    }

    /// Leave the editor: save unless the record was deleted
    pub fn exit<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<Option<Notice>, EditorError> {
        if self.has_been_deleted {
            log::debug!("event=editor_exit_skip_save id={}", self.id);
            return Ok(None);
        }
        self.save(store).map(Some)
    }
}

/// Epoch millis of local midnight on `date`, the stored form of a due date
pub fn due_date_millis(date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// An open editor bound to its store. Dropping the session performs the
/// exit-save; use [`EditorSession::close`] to observe its outcome instead.
pub struct EditorSession<S: NoteStore> {
    store: S,
    editor: TodoEditor,
    closed: bool,
}

impl<S: NoteStore> EditorSession<S> {
    pub fn open(store: S, id: i64) -> Result<Self, EditorError> {
        let editor = TodoEditor::open(&store, id)?;
        Ok(Self {
            store,
            editor,
            closed: false,
        })
    }

    pub fn editor(&self) -> &TodoEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TodoEditor {
        &mut self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self) -> Result<Notice, EditorError> {
        self.editor.save(&self.store)
    }

    pub fn delete(&mut self) -> Result<Notice, EditorError> {
        self.editor.delete(&self.store)
    }

    /// Run the exit-save now and report its result
    pub fn close(mut self) -> Result<Option<Notice>, EditorError> {
        self.closed = true;
        self.editor.exit(&self.store)
    }
}

impl<S: NoteStore> Drop for EditorSession<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.editor.exit(&self.store) {
            log::error!(
                "event=editor_exit_save_failed id={} error={}",
                self.editor.id(),
                e
            );
        }
    }
}
