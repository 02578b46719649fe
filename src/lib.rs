pub mod cli;
pub mod config;
pub mod database;
pub mod filter;
pub mod logging;
pub mod menu;
pub mod models;
pub mod notes_list;
pub mod presenter;
pub mod todo_editor;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::{Database, NoteStore};
pub use models::{Category, NoteRecord, Priority};
pub use notes_list::ListController;
pub use todo_editor::{EditorSession, TodoEditor};
pub use utils::Profile;
