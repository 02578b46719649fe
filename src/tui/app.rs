use std::rc::Rc;
use std::time::Instant;

use chrono::{Days, Months, NaiveDate};
use ratatui::widgets::ListState;

use crate::database::{Database, DatabaseError, NoteStore};
use crate::filter::CategoryFilter;
use crate::menu::{self, ContextAction, MenuCommand, MenuOption};
use crate::models::{Category, EntryKind, Notice};
use crate::notes_list::{ListController, ListEffect, Navigation};
use crate::todo_editor::{EditorError, EditorKind, EditorSession};
use crate::tui::error::TuiError;
use crate::tui::keymap::KeyMap;
use crate::tui::widgets::text_input::TextInput;
use crate::Config;

/// Store handle shared by the list and an open editor session
pub type Store = Rc<Database>;

const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Search,
    Menu,
    Editor,
    DatePicker,
    Categories,
    Help,
}

/// What choosing an entry of the open popup menu does
#[derive(Debug, Clone)]
pub enum MenuTarget {
    Command(Vec<MenuOption<MenuCommand>>),
    Context {
        row: usize,
        options: Vec<MenuOption<ContextAction>>,
    },
    CategoryPicker {
        kind: EntryKind,
        options: Vec<MenuOption<Option<i64>>>,
    },
}

#[derive(Debug, Clone)]
pub struct MenuPopup {
    pub title: String,
    pub target: MenuTarget,
    pub selected: usize,
}

impl MenuPopup {
    pub fn labels(&self) -> Vec<String> {
        match &self.target {
            MenuTarget::Command(options) => options.iter().map(|o| o.label.clone()).collect(),
            MenuTarget::Context { options, .. } => options.iter().map(|o| o.label.clone()).collect(),
            MenuTarget::CategoryPicker { options, .. } => {
                options.iter().map(|o| o.label.clone()).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match &self.target {
            MenuTarget::Command(options) => options.len(),
            MenuTarget::Context { options, .. } => options.len(),
            MenuTarget::CategoryPicker { options, .. } => options.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn move_up(&mut self) {
        if self.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn move_down(&mut self) {
        if self.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Body,
    Completed,
    Priority,
    DueDate,
}

impl EditorField {
    /// Tab order of the fields shown for `kind`
    pub fn order(kind: EditorKind) -> &'static [EditorField] {
        match kind {
            EditorKind::Note => &[EditorField::Title, EditorField::Body],
            EditorKind::Todo => &[
                EditorField::Title,
                EditorField::Body,
                EditorField::Completed,
                EditorField::Priority,
                EditorField::DueDate,
            ],
        }
    }
}

/// Open editor screen: the session plus the text buffers for its fields
pub struct EditorUi {
    pub session: EditorSession<Store>,
    pub field: EditorField,
    pub title: TextInput,
    pub body: TextInput,
}

impl EditorUi {
    pub fn open(store: Store, id: i64) -> Result<Self, EditorError> {
        let session = EditorSession::open(store, id)?;
        let title = TextInput::from_text(session.editor().title(), false);
        let body = TextInput::from_text(session.editor().body(), true);
        Ok(Self {
            session,
            field: EditorField::Title,
            title,
            body,
        })
    }

    pub fn kind(&self) -> EditorKind {
        self.session.editor().kind()
    }

    pub fn next_field(&mut self) {
        let order = EditorField::order(self.kind());
        let index = order.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = order[(index + 1) % order.len()];
    }

    pub fn previous_field(&mut self) {
        let order = EditorField::order(self.kind());
        let index = order.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = order[(index + order.len() - 1) % order.len()];
    }

    /// Push the focused text buffer into the working set
    pub fn sync_text(&mut self) {
        let editor = self.session.editor_mut();
        match self.field {
            EditorField::Title => editor.set_title(self.title.text()),
            EditorField::Body => editor.set_body(self.body.text()),
            _ => {}
        }
    }
}

/// Month calendar used to pick a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePickerState {
    pub selected: NaiveDate,
}

impl DatePickerState {
    pub fn new(selected: NaiveDate) -> Self {
        Self { selected }
    }

    pub fn move_days(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.selected.checked_add_days(Days::new(days as u64))
        } else {
            self.selected.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.selected = date;
        }
    }

    /// Move by whole months, clamping the day to the target month's length
    pub fn move_months(&mut self, months: i32) {
        let moved = if months >= 0 {
            self.selected.checked_add_months(Months::new(months as u32))
        } else {
            self.selected.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.selected = date;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryPrompt {
    Add,
    Rename(i64),
}

#[derive(Debug)]
pub struct CategoryManagerState {
    pub selected_index: usize,
    pub list_state: ListState,
    pub prompt: Option<CategoryPrompt>,
    pub name_input: TextInput,
    /// Category awaiting delete confirmation, with its note count
    pub pending_delete: Option<(i64, i64)>,
}

impl Default for CategoryManagerState {
    fn default() -> Self {
        Self {
            selected_index: 0,
            list_state: ListState::default(),
            prompt: None,
            name_input: TextInput::single_line(),
            pending_delete: None,
        }
    }
}

#[derive(Debug)]
pub struct UiState {
    pub mode: Mode,
    /// Mode to go back to when help closes
    pub help_return: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
}

#[derive(Debug, Default)]
pub struct StatusState {
    pub notice: Option<Notice>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub keys: KeyMap,
    pub store: Store,
    pub list: ListController,
    pub categories: Vec<Category>,
    pub ui: UiState,
    pub status: StatusState,
    pub search_input: TextInput,
    pub menu: Option<MenuPopup>,
    pub editor: Option<EditorUi>,
    pub date_picker: Option<DatePickerState>,
    pub category_manager: CategoryManagerState,
}

impl App {
    pub fn new(config: Config, store: Store) -> Result<Self, TuiError> {
        let keys = KeyMap::from_config(&config.key_bindings)?;
        let categories = store.list_categories()?;
        let mut list = ListController::new();
        list.refresh(&*store)?;

        let mut app = Self {
            config,
            keys,
            store,
            list,
            categories,
            ui: UiState {
                mode: Mode::List,
                help_return: Mode::List,
                selected_index: 0,
                list_state: ListState::default(),
            },
            status: StatusState::default(),
            search_input: TextInput::single_line(),
            menu: None,
            editor: None,
            date_picker: None,
            category_manager: CategoryManagerState::default(),
        };
        app.sync_list_state();
        Ok(app)
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.status.notice = Some(notice);
        self.status.message_time = Some(Instant::now());
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.set_notice(Notice::info(message));
    }

    pub fn clear_status_message(&mut self) {
        self.status.notice = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    fn report_error(&mut self, event: &str, error: impl std::fmt::Display) {
        log::error!("event={} error={}", event, error);
        self.set_notice(Notice::error(error.to_string()));
    }

    // List selection

    pub fn selected_row(&self) -> Option<usize> {
        if self.list.records().is_empty() {
            None
        } else {
            Some(self.ui.selected_index)
        }
    }

    /// Clamp the selection to the current rows and mirror it into the widget state
    pub fn sync_list_state(&mut self) {
        let len = self.list.records().len();
        if len == 0 {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            self.ui.selected_index = self.ui.selected_index.min(len - 1);
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        self.ui.selected_index = self.ui.selected_index.saturating_sub(1);
        self.sync_list_state();
    }

    pub fn move_selection_down(&mut self) {
        let len = self.list.records().len();
        if self.ui.selected_index + 1 < len {
            self.ui.selected_index += 1;
        }
        self.sync_list_state();
    }

    pub fn refresh_list(&mut self) {
        if let Err(e) = self.list.refresh(&*self.store) {
            self.report_error("list_refresh_failed", e);
        }
        self.sync_list_state();
    }

    fn reload_categories(&mut self) {
        match self.store.list_categories() {
            Ok(categories) => self.categories = categories,
            Err(e) => self.report_error("category_load_failed", e),
        }
    }

    // Commands and their effects

    pub fn run_command(&mut self, command: MenuCommand) {
        let result = self.list.apply(&*self.store, command);
        self.sync_list_state();
        match result {
            Ok(effect) => self.apply_effect(effect),
            Err(e) => self.report_error("menu_command_failed", e),
        }
    }

    pub fn run_context_action(&mut self, row: usize, action: ContextAction) {
        let result = self.list.context_action(&*self.store, row, action);
        self.sync_list_state();
        match result {
            Ok(effect) => self.apply_effect(effect),
            Err(e) => self.report_error("context_action_failed", e),
        }
    }

    pub fn apply_effect(&mut self, effect: ListEffect) {
        match effect {
            ListEffect::None => {}
            ListEffect::Notice(notice) => self.set_notice(notice),
            ListEffect::Navigate(navigation) => self.navigate(navigation),
            ListEffect::CopyToClipboard(text) => self.copy_to_clipboard(&text),
        }
    }

    fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::TodoEditor(id) | Navigation::NoteEditor(id) => self.open_editor(id),
            Navigation::PickCategory(kind) => self.open_category_picker(kind),
            Navigation::ManageCategories => self.open_category_manager(),
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        match result {
            Ok(()) => self.set_status_message(format!("Copied {}", text)),
            Err(e) => {
                log::warn!("event=clipboard_failed error={}", e);
                self.set_notice(Notice::error("Clipboard unavailable"));
            }
        }
    }

    /// New note from the clipboard; see [`ListController::paste`]
    pub fn paste_from_clipboard(&mut self) {
        let text = match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(arboard::Error::ContentNotAvailable) => {
                self.set_status_message("Clipboard is empty");
                return;
            }
            Err(e) => {
                log::warn!("event=clipboard_failed error={}", e);
                self.set_notice(Notice::error("Clipboard unavailable"));
                return;
            }
        };
        self.ui.selected_index = 0;
        self.run_command(MenuCommand::Paste(text));
    }

    /// Run `action` on the selected row. Nothing happens on an empty list.
    pub fn act_on_selected(&mut self, action: ContextAction) {
        if let Some(row) = self.selected_row() {
            self.run_context_action(row, action);
        }
    }

    /// Flip completion of the selected todo. Plain notes are left alone.
    pub fn toggle_selected_complete(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let Some(record) = self.list.record_at(row) else {
            return;
        };
        if !record.is_todo {
            self.set_status_message("Only todos can be completed");
            return;
        }
        let action = if record.is_completed {
            ContextAction::MarkIncomplete
        } else {
            ContextAction::MarkComplete
        };
        self.run_context_action(row, action);
    }

    // Popup menus

    pub fn open_category_filter_menu(&mut self) {
        self.reload_categories();
        let current = self.list.filter().category.id();
        let selected = current
            .and_then(|id| self.categories.iter().position(|c| c.id == id))
            .map(|index| index + 1)
            .unwrap_or(0);
        self.open_menu(
            "Category",
            MenuTarget::Command(menu::category_filter_options(&self.categories)),
            selected,
        );
    }

    pub fn open_todo_filter_menu(&mut self) {
        let current = self.list.filter().todo;
        let selected = crate::filter::TodoFilter::MENU_ORDER
            .iter()
            .position(|f| *f == current)
            .unwrap_or(0);
        self.open_menu("Show", MenuTarget::Command(menu::todo_filter_options()), selected);
    }

    pub fn open_context_menu(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let Some(record) = self.list.record_at(row) else {
            return;
        };
        let options = menu::context_options(record);
        let title = crate::tui::widgets::truncate_with_ellipsis(&record.title, 30);
        self.open_menu(&title, MenuTarget::Context { row, options }, 0);
    }

    /// Ask which category a new entry goes in. With no categories at all the
    /// entry is created uncategorized right away.
    pub fn open_category_picker(&mut self, kind: EntryKind) {
        self.reload_categories();
        if self.categories.is_empty() {
            self.create_entry(kind, None);
            return;
        }
        let options = self
            .categories
            .iter()
            .map(|c| MenuOption::new(c.name.clone(), Some(c.id)))
            .collect();
        // Preselect the category being filtered on
        let selected = self
            .list
            .filter()
            .category
            .id()
            .and_then(|id| self.categories.iter().position(|c| c.id == id))
            .unwrap_or(0);
        self.open_menu(
            &format!("New {} in", kind.label()),
            MenuTarget::CategoryPicker { kind, options },
            selected,
        );
    }

    fn open_menu(&mut self, title: &str, target: MenuTarget, selected: usize) {
        self.menu = Some(MenuPopup {
            title: title.to_string(),
            target,
            selected,
        });
        self.ui.mode = Mode::Menu;
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
        if self.ui.mode == Mode::Menu {
            self.ui.mode = Mode::List;
        }
    }

    /// Dispatch the highlighted menu entry
    pub fn choose_menu_option(&mut self) {
        let Some(popup) = self.menu.take() else {
            return;
        };
        self.ui.mode = Mode::List;
        let selected = popup.selected;
        match popup.target {
            MenuTarget::Command(options) => {
                if let Some(option) = options.into_iter().nth(selected) {
                    self.ui.selected_index = 0;
                    self.run_command(option.command);
                }
            }
            MenuTarget::Context { row, options } => {
                if let Some(option) = options.get(selected) {
                    self.run_context_action(row, option.command);
                }
            }
            MenuTarget::CategoryPicker { kind, options } => {
                if let Some(option) = options.get(selected) {
                    self.create_entry(kind, option.command);
                }
            }
        }
    }

    // Entries and the editor

    pub fn create_entry(&mut self, kind: EntryKind, category_id: Option<i64>) {
        match self.list.create_entry(&*self.store, kind, category_id) {
            Ok(id) => {
                self.sync_list_state();
                self.open_editor(id);
            }
            Err(notice) => self.set_notice(notice),
        }
    }

    pub fn open_editor(&mut self, id: i64) {
        // Close a previous session first so its exit-save lands before the load
        self.close_editor();
        match EditorUi::open(self.store.clone(), id) {
            Ok(editor) => {
                self.editor = Some(editor);
                self.ui.mode = Mode::Editor;
            }
            Err(e) => {
                self.report_error("editor_open_failed", e);
                self.ui.mode = Mode::List;
            }
        }
    }

    /// Leave the editor. The session's exit-save runs here unless the entry
    /// was deleted.
    pub fn close_editor(&mut self) {
        let Some(mut editor) = self.editor.take() else {
            return;
        };
        editor.sync_text();
        match editor.session.close() {
            Ok(Some(notice)) => self.set_notice(notice),
            Ok(None) => {}
            Err(e) => self.report_error("editor_exit_save_failed", e),
        }
        self.date_picker = None;
        self.ui.mode = Mode::List;
        self.refresh_list();
    }

    /// Explicit save. Success leaves the editor; a failed save keeps it open.
    pub fn save_editor(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.sync_text();
        match editor.session.save() {
            Ok(_) => self.close_editor(),
            Err(e) => self.report_error("editor_save_failed", e),
        }
    }

    pub fn delete_from_editor(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match editor.session.delete() {
            Ok(notice) => {
                self.close_editor();
                self.set_notice(notice);
            }
            Err(e) => self.report_error("editor_delete_failed", e),
        }
    }

    pub fn open_date_picker(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        self.date_picker = Some(DatePickerState::new(editor.session.editor().due_date_or_today()));
        self.ui.mode = Mode::DatePicker;
    }

    pub fn confirm_date_picker(&mut self) {
        if let (Some(picker), Some(editor)) = (self.date_picker.take(), self.editor.as_mut()) {
            editor.session.editor_mut().pick_due_date(picker.selected);
        }
        self.ui.mode = Mode::Editor;
    }

    pub fn cancel_date_picker(&mut self) {
        self.date_picker = None;
        self.ui.mode = Mode::Editor;
    }

    // Search

    /// Focus the search bar, showing it first if it is hidden
    pub fn enter_search(&mut self) {
        if !self.list.is_search_visible() {
            self.run_command(MenuCommand::ToggleSearch);
        }
        self.search_input = TextInput::from_text(&self.list.filter().search_text, false);
        self.ui.mode = Mode::Search;
    }

    pub fn submit_search(&mut self) {
        let text = self.search_input.text();
        self.ui.selected_index = 0;
        self.run_command(MenuCommand::SubmitSearch(text));
        self.ui.mode = Mode::List;
    }

    /// Hide the search bar, dropping the active search
    pub fn close_search(&mut self) {
        if self.list.is_search_visible() {
            self.run_command(MenuCommand::ToggleSearch);
        }
        self.search_input.clear();
        self.ui.mode = Mode::List;
    }

    // Category manager

    pub fn open_category_manager(&mut self) {
        self.reload_categories();
        self.category_manager = CategoryManagerState::default();
        self.sync_category_selection();
        self.ui.mode = Mode::Categories;
    }

    pub fn close_category_manager(&mut self) {
        self.category_manager = CategoryManagerState::default();
        self.ui.mode = Mode::List;
        self.refresh_list();
    }

    fn sync_category_selection(&mut self) {
        let state = &mut self.category_manager;
        if self.categories.is_empty() {
            state.selected_index = 0;
            state.list_state.select(None);
        } else {
            state.selected_index = state.selected_index.min(self.categories.len() - 1);
            state.list_state.select(Some(state.selected_index));
        }
    }

    pub fn category_selection_up(&mut self) {
        self.category_manager.selected_index = self.category_manager.selected_index.saturating_sub(1);
        self.sync_category_selection();
    }

    pub fn category_selection_down(&mut self) {
        if self.category_manager.selected_index + 1 < self.categories.len() {
            self.category_manager.selected_index += 1;
        }
        self.sync_category_selection();
    }

    fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.category_manager.selected_index)
    }

    pub fn start_category_add(&mut self) {
        self.category_manager.prompt = Some(CategoryPrompt::Add);
        self.category_manager.name_input = TextInput::single_line();
    }

    pub fn start_category_rename(&mut self) {
        let Some(category) = self.selected_category() else {
            return;
        };
        let (id, name) = (category.id, category.name.clone());
        self.category_manager.prompt = Some(CategoryPrompt::Rename(id));
        self.category_manager.name_input = TextInput::from_text(&name, false);
    }

    pub fn cancel_category_prompt(&mut self) {
        self.category_manager.prompt = None;
        self.category_manager.pending_delete = None;
    }

    pub fn submit_category_prompt(&mut self) {
        let Some(prompt) = self.category_manager.prompt else {
            return;
        };
        let name = self.category_manager.name_input.text().trim().to_string();
        if name.is_empty() {
            self.set_notice(Notice::error("Category name cannot be empty"));
            return;
        }
        let result = match prompt {
            CategoryPrompt::Add => self.store.insert_category(&name).map(|id| {
                log::info!("event=category_added id={}", id);
                format!("Added category {}", name)
            }),
            CategoryPrompt::Rename(id) => self.store.rename_category(id, &name).map(|_| {
                log::info!("event=category_renamed id={}", id);
                format!("Renamed category to {}", name)
            }),
        };
        self.finish_category_change(result);
        // Keep the list title in step with a renamed filter category
        if let CategoryPrompt::Rename(id) = prompt {
            if self.list.filter().category.id() == Some(id) {
                self.run_command(MenuCommand::FilterCategory(CategoryFilter::Only { id, name }));
            }
        }
    }

    pub fn request_category_delete(&mut self) {
        let Some(id) = self.selected_category().map(|c| c.id) else {
            return;
        };
        match self.store.count_notes_in_category(id) {
            Ok(count) => self.category_manager.pending_delete = Some((id, count)),
            Err(e) => self.report_error("category_count_failed", e),
        }
    }

    pub fn confirm_category_delete(&mut self) {
        let Some((id, _)) = self.category_manager.pending_delete.take() else {
            return;
        };
        let result = self.store.delete_category(id).map(|_| {
            log::info!("event=category_deleted id={}", id);
            "Category deleted".to_string()
        });
        self.finish_category_change(result);
        if self.list.filter().category.id() == Some(id) {
            self.run_command(MenuCommand::FilterCategory(CategoryFilter::All));
        }
    }

    fn finish_category_change(&mut self, result: Result<String, DatabaseError>) {
        self.category_manager.prompt = None;
        match result {
            Ok(message) => self.set_status_message(message),
            Err(e) => self.report_error("category_change_failed", e),
        }
        self.reload_categories();
        self.sync_category_selection();
    }

    // Help

    pub fn open_help(&mut self) {
        self.ui.help_return = self.ui.mode;
        self.ui.mode = Mode::Help;
    }

    pub fn close_help(&mut self) {
        self.ui.mode = self.ui.help_return;
    }

    /// Close whatever is open so pending edits are saved, then quit
    pub fn shutdown(&mut self) {
        self.date_picker = None;
        self.close_editor();
        log::info!("event=app_quit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_picker_moves_by_day_and_month() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let mut picker = DatePickerState::new(start);
        picker.move_days(1);
        assert_eq!(picker.selected, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        picker.move_days(-7);
        assert_eq!(picker.selected, NaiveDate::from_ymd_opt(2024, 1, 25).unwrap());

        let mut picker = DatePickerState::new(start);
        picker.move_months(1);
        assert_eq!(picker.selected, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        picker.move_months(-2);
        assert_eq!(picker.selected, NaiveDate::from_ymd_opt(2023, 12, 29).unwrap());
    }

    #[test]
    fn editor_fields_follow_the_kind() {
        assert_eq!(EditorField::order(EditorKind::Note).len(), 2);
        assert_eq!(EditorField::order(EditorKind::Todo).last(), Some(&EditorField::DueDate));
    }

    #[test]
    fn menu_selection_wraps() {
        let mut popup = MenuPopup {
            title: "Show".to_string(),
            target: MenuTarget::Command(menu::todo_filter_options()),
            selected: 0,
        };
        popup.move_up();
        assert_eq!(popup.selected, 3);
        popup.move_down();
        assert_eq!(popup.selected, 0);
        assert_eq!(popup.labels()[0], "All");
    }
}
