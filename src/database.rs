use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

use crate::filter::Predicate;
use crate::models::{Category, NoteRecord, Priority, now_millis};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Refusing to {0} with an empty value set")]
    EmptyValues(&'static str),
}

/// Column list every note query selects, in this order
const NOTE_COLUMNS: &str =
    "id, title, body, modified_at, category_id, is_todo, is_completed, due_date, priority, created_at";

/// Writable columns of the `notes` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteColumn {
    Title,
    Body,
    CategoryId,
    IsTodo,
    IsCompleted,
    DueDate,
    Priority,
    CreatedAt,
    ModifiedAt,
}

impl NoteColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteColumn::Title => "title",
            NoteColumn::Body => "body",
            NoteColumn::CategoryId => "category_id",
            NoteColumn::IsTodo => "is_todo",
            NoteColumn::IsCompleted => "is_completed",
            NoteColumn::DueDate => "due_date",
            NoteColumn::Priority => "priority",
            NoteColumn::CreatedAt => "created_at",
            NoteColumn::ModifiedAt => "modified_at",
        }
    }
}

/// Ordered column/value pairs for an insert or update.
///
/// A column that was never `put` is left untouched by an update; a column set
/// with [`NoteValues::put_null`] is written as NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteValues {
    entries: Vec<(NoteColumn, Value)>,
}

impl NoteValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any earlier value for it
    pub fn put(&mut self, column: NoteColumn, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
        self
    }

    pub fn put_bool(&mut self, column: NoteColumn, value: bool) -> &mut Self {
        self.put(column, i64::from(value))
    }

    pub fn put_null(&mut self, column: NoteColumn) -> &mut Self {
        self.put(column, Value::Null)
    }

    pub fn get(&self, column: NoteColumn) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, column: NoteColumn) -> bool {
        self.get(column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NoteColumn, Value)> {
        self.entries.iter()
    }
}

/// Storage operations the list screen and the editors rely on.
///
/// All calls are synchronous; implementations are expected to be used from a
/// single thread.
pub trait NoteStore {
    /// Run a list query. `selection` is a conjunction of clauses with `?`
    /// placeholders bound positionally from `args`.
    fn query_notes(
        &self,
        selection: Option<&str>,
        args: &[Value],
        sort_order: &str,
    ) -> Result<Vec<NoteRecord>, DatabaseError>;

    /// Fetch one note by id
    fn get_note(&self, id: i64) -> Result<Option<NoteRecord>, DatabaseError>;

    /// Insert a note and return its new id
    fn insert_note(&self, values: &NoteValues) -> Result<i64, DatabaseError>;

    /// Update the given columns of one note, returning the affected row count
    fn update_note(&self, id: i64, values: &NoteValues) -> Result<usize, DatabaseError>;

    /// Delete one note, returning the affected row count
    fn delete_note(&self, id: i64) -> Result<usize, DatabaseError>;

    /// Point lookup of one category
    fn find_category(&self, id: i64) -> Result<Option<Category>, DatabaseError>;

    /// All categories ordered by creation time ascending
    fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    /// Run a compiled list predicate
    fn query_predicate(
        &self,
        predicate: &Predicate,
        sort_order: &str,
    ) -> Result<Vec<NoteRecord>, DatabaseError> {
        let selection = predicate.selection();
        self.query_notes(selection.as_deref(), &predicate.args, sort_order)
    }
}

impl<S: NoteStore + ?Sized> NoteStore for &S {
    fn query_notes(
        &self,
        selection: Option<&str>,
        args: &[Value],
        sort_order: &str,
    ) -> Result<Vec<NoteRecord>, DatabaseError> {
        (**self).query_notes(selection, args, sort_order)
    }

    fn get_note(&self, id: i64) -> Result<Option<NoteRecord>, DatabaseError> {
        (**self).get_note(id)
    }

    fn insert_note(&self, values: &NoteValues) -> Result<i64, DatabaseError> {
        (**self).insert_note(values)
    }

    fn update_note(&self, id: i64, values: &NoteValues) -> Result<usize, DatabaseError> {
        (**self).update_note(id, values)
    }

    fn delete_note(&self, id: i64) -> Result<usize, DatabaseError> {
        (**self).delete_note(id)
    }

    fn find_category(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        (**self).find_category(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        (**self).list_categories()
    }
}

impl<S: NoteStore + ?Sized> NoteStore for Rc<S> {
    fn query_notes(
        &self,
        selection: Option<&str>,
        args: &[Value],
        sort_order: &str,
    ) -> Result<Vec<NoteRecord>, DatabaseError> {
        (**self).query_notes(selection, args, sort_order)
    }

    fn get_note(&self, id: i64) -> Result<Option<NoteRecord>, DatabaseError> {
        (**self).get_note(id)
    }

    fn insert_note(&self, values: &NoteValues) -> Result<i64, DatabaseError> {
        (**self).insert_note(values)
    }

    fn update_note(&self, id: i64, values: &NoteValues) -> Result<usize, DatabaseError> {
        (**self).update_note(id, values)
    }

    fn delete_note(&self, id: i64) -> Result<usize, DatabaseError> {
        (**self).delete_note(id)
    }

    fn find_category(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        (**self).find_category(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        (**self).list_categories()
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let db = Database { conn };
        db.initialize_schema()?;
        log::info!("event=db_open path={}", db_path.display());

        Ok(db)
    }

    /// Open a throwaway in-memory database with the full schema
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                body            TEXT NOT NULL DEFAULT '',
                category_id     INTEGER,
                is_todo         INTEGER NOT NULL DEFAULT 0,
                is_completed    INTEGER NOT NULL DEFAULT 0,
                due_date        INTEGER,
                priority        INTEGER NOT NULL DEFAULT 1,
                created_at      INTEGER NOT NULL,
                modified_at     INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                created_at      INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_modified_at ON notes(modified_at)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_category_id ON notes(category_id)",
            [],
        )?;

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Helper function to map a row to a NoteRecord
    fn row_to_note(row: &rusqlite::Row) -> Result<NoteRecord, rusqlite::Error> {
        let due_date: Option<i64> = row.get(7)?;
        let priority: i64 = row.get(8)?;
        Ok(NoteRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            modified_at: row.get(3)?,
            category_id: row.get(4)?,
            is_todo: row.get::<_, i64>(5)? != 0,
            is_completed: row.get::<_, i64>(6)? != 0,
            // Non-positive values are the "no due date" sentinel
            due_date: due_date.filter(|d| *d > 0),
            priority: Priority::from_i64(priority).unwrap_or_default(),
            created_at: row.get(9)?,
        })
    }

    fn row_to_category(row: &rusqlite::Row) -> Result<Category, rusqlite::Error> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    /// Insert a category and return its ID
    pub fn insert_category(&self, name: &str) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO categories (name, created_at) VALUES (?1, ?2)",
            params![name, now_millis()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Rename a category, returning the affected row count
    pub fn rename_category(&self, id: i64, name: &str) -> Result<usize, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        Ok(changed)
    }

    /// Delete a category by ID
    /// Notes that belonged to it become uncategorized
    pub fn delete_category(&self, id: i64) -> Result<usize, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE notes SET category_id = NULL WHERE category_id = ?1",
            params![id],
        )?;
        let changed = tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(changed)
    }

    /// Seed a first category when the table is empty, so new entries always
    /// have something to be filed under
    pub fn ensure_default_category(&self, name: &str) -> Result<Option<i64>, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(None);
        }
        let id = self.insert_category(name)?;
        log::info!("event=category_seeded id={} name={}", id, name);
        Ok(Some(id))
    }

    /// Count notes in a category (used by the category manager)
    pub fn count_notes_in_category(&self, id: i64) -> Result<i64, DatabaseError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE category_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl NoteStore for Database {
    fn query_notes(
        &self,
        selection: Option<&str>,
        args: &[Value],
        sort_order: &str,
    ) -> Result<Vec<NoteRecord>, DatabaseError> {
        let mut sql = format!("SELECT {} FROM notes", NOTE_COLUMNS);
        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection);
        }
        if !sort_order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(sort_order);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map(params_from_iter(args.iter()), Self::row_to_note)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "event=notes_query selection={:?} args={} rows={}",
            selection,
            args.len(),
            notes.len()
        );
        Ok(notes)
    }

    fn get_note(&self, id: i64) -> Result<Option<NoteRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_note) {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    fn insert_note(&self, values: &NoteValues) -> Result<i64, DatabaseError> {
        if values.is_empty() {
            return Err(DatabaseError::EmptyValues("insert"));
        }
        let columns: Vec<&str> = values.iter().map(|(c, _)| c.as_str()).collect();
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO notes ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );

        self.conn
            .execute(&sql, params_from_iter(values.iter().map(|(_, v)| v)))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_note(&self, id: i64, values: &NoteValues) -> Result<usize, DatabaseError> {
        if values.is_empty() {
            return Err(DatabaseError::EmptyValues("update"));
        }
        let assignments: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, (c, _))| format!("{} = ?{}", c.as_str(), i + 1))
            .collect();
        let sql = format!(
            "UPDATE notes SET {} WHERE id = ?{}",
            assignments.join(", "),
            values.len() + 1
        );

        let mut bound: Vec<Value> = values.iter().map(|(_, v)| v.clone()).collect();
        bound.push(Value::Integer(id));

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(&sql, params_from_iter(bound.iter()))?;
        tx.commit()?;
        Ok(changed)
    }

    fn delete_note(&self, id: i64) -> Result<usize, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(changed)
    }

    fn find_category(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM categories WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_category) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at FROM categories ORDER BY created_at ASC, id ASC",
        )?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}
