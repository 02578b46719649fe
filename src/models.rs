use serde::{Deserialize, Serialize};

/// Current time as epoch milliseconds, the unit every timestamp column uses
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Integer stored in the `priority` column
    pub fn as_i64(self) -> i64 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// Map a stored integer back to a priority. Unknown values resolve to `None`
    /// so callers can decide on their own default.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Some(Priority::Low),
            "medium" | "med" | "m" => Some(Priority::Medium),
            "high" | "h" => Some(Priority::High),
            _ => None,
        }
    }
}

/// One persisted note or todo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub category_id: Option<i64>,
    pub is_todo: bool,
    pub is_completed: bool,
    /// Epoch millis. `None` means no due date (NULL or a non-positive value in storage)
    pub due_date: Option<i64>,
    pub priority: Priority,
    pub created_at: i64,
    pub modified_at: i64,
}

impl NoteRecord {
    /// True when the row should render with the completed-todo styling
    pub fn is_completed_todo(&self) -> bool {
        self.is_todo && self.is_completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Which kind of entry a new row is created as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Note,
    Todo,
}

impl EntryKind {
    pub fn default_title(self) -> &'static str {
        match self {
            EntryKind::Note => "New note",
            EntryKind::Todo => "New todo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Note => "note",
            EntryKind::Todo => "todo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short user-visible acknowledgement, shown in the status bar or printed by the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

const NOTE_URI_PREFIX: &str = "notepad://notes/";

/// URI handed to the clipboard by the copy action
pub fn note_uri(id: i64) -> String {
    format!("{}{}", NOTE_URI_PREFIX, id)
}

/// Inverse of [`note_uri`]. Surrounding whitespace is ignored.
pub fn parse_note_uri(text: &str) -> Option<i64> {
    text.trim()
        .strip_prefix(NOTE_URI_PREFIX)
        .and_then(|id| id.parse().ok())
}
