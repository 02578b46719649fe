use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;

use crate::menu::{ContextAction, MenuCommand};
use crate::tui::app::{EditorField, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::text_input::TextInput;
use crate::tui::App;
use crate::utils::has_primary_modifier;

const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the user's
/// shell is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After this the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already in a cleanup path, errors are ignored
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering alternate screen so the message
    // lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;
    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    log::info!("event=tui_start rows={}", app.list.records().len());

    loop {
        app.check_status_message_timeout();

        let terminal_size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, app.list.is_search_visible());
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(POLL_INTERVAL)? {
            // Only Press events; Windows also reports Release
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    Ok(())
}

/// Handle one key press. Returns `true` when the app should quit.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.shutdown();
        return Ok(true);
    }

    match app.ui.mode {
        Mode::Help => handle_help(app, key),
        Mode::Menu => handle_menu(app, key),
        Mode::Search => handle_search(app, key),
        Mode::DatePicker => handle_date_picker(app, key),
        Mode::Categories => handle_categories(app, key),
        Mode::Editor => handle_editor(app, key),
        Mode::List => return handle_list(app, key),
    }
    Ok(false)
}

fn handle_list(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    let keys = app.keys.clone();

    if keys.quit.matches(&key) {
        app.shutdown();
        return Ok(true);
    }

    if keys.list_up.matches(&key) || key.code == KeyCode::Up {
        app.move_selection_up();
    } else if keys.list_down.matches(&key) || key.code == KeyCode::Down {
        app.move_selection_down();
    } else if key.code == KeyCode::Home {
        app.ui.selected_index = 0;
        app.sync_list_state();
    } else if key.code == KeyCode::End {
        app.ui.selected_index = app.list.records().len().saturating_sub(1);
        app.sync_list_state();
    } else if keys.new_note.matches(&key) {
        app.run_command(MenuCommand::AddNote);
    } else if keys.new_todo.matches(&key) {
        app.run_command(MenuCommand::AddTodo);
    } else if keys.search.matches(&key) {
        app.enter_search();
    } else if keys.category_filter.matches(&key) {
        app.open_category_filter_menu();
    } else if keys.todo_filter.matches(&key) {
        app.open_todo_filter_menu();
    } else if keys.categories.matches(&key) {
        app.run_command(MenuCommand::ManageCategories);
    } else if keys.open.matches(&key) {
        app.act_on_selected(ContextAction::Open);
    } else if keys.context_menu.matches(&key) {
        app.open_context_menu();
    } else if keys.toggle_complete.matches(&key) {
        app.toggle_selected_complete();
    } else if keys.delete.matches(&key) {
        app.act_on_selected(ContextAction::Delete);
    } else if keys.copy.matches(&key) {
        app.act_on_selected(ContextAction::Copy);
    } else if keys.paste.matches(&key) {
        app.paste_from_clipboard();
    } else if keys.help.matches(&key) {
        app.open_help();
    } else if key.code == KeyCode::Esc && app.list.is_search_visible() {
        app.close_search();
    }
    Ok(false)
}

fn handle_help(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc || app.keys.help.matches(&key) {
        app.close_help();
    }
}

fn handle_menu(app: &mut App, key: KeyEvent) {
    let keys = app.keys.clone();
    let Some(popup) = app.menu.as_mut() else {
        app.close_menu();
        return;
    };
    if key.code == KeyCode::Up || keys.list_up.matches(&key) {
        popup.move_up();
    } else if key.code == KeyCode::Down || keys.list_down.matches(&key) {
        popup.move_down();
    } else if key.code == KeyCode::Enter {
        app.choose_menu_option();
    } else if key.code == KeyCode::Esc {
        app.close_menu();
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.close_search(),
        _ => {
            handle_text_input(&mut app.search_input, key);
        }
    }
}

fn handle_date_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_date_picker(),
        KeyCode::Esc => app.cancel_date_picker(),
        _ => {
            let Some(picker) = app.date_picker.as_mut() else {
                app.cancel_date_picker();
                return;
            };
            match key.code {
                KeyCode::Left => picker.move_days(-1),
                KeyCode::Right => picker.move_days(1),
                KeyCode::Up => picker.move_days(-7),
                KeyCode::Down => picker.move_days(7),
                KeyCode::PageUp => picker.move_months(-1),
                KeyCode::PageDown => picker.move_months(1),
                _ => {}
            }
        }
    }
}

fn handle_categories(app: &mut App, key: KeyEvent) {
    if app.category_manager.pending_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_category_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_category_prompt(),
            _ => {}
        }
        return;
    }

    if app.category_manager.prompt.is_some() {
        match key.code {
            KeyCode::Enter => app.submit_category_prompt(),
            KeyCode::Esc => app.cancel_category_prompt(),
            _ => {
                handle_text_input(&mut app.category_manager.name_input, key);
            }
        }
        return;
    }

    let keys = app.keys.clone();
    if key.code == KeyCode::Up || keys.list_up.matches(&key) {
        app.category_selection_up();
    } else if key.code == KeyCode::Down || keys.list_down.matches(&key) {
        app.category_selection_down();
    } else if key.code == KeyCode::Char('a') {
        app.start_category_add();
    } else if key.code == KeyCode::Char('r') {
        app.start_category_rename();
    } else if key.code == KeyCode::Char('d') || keys.delete.matches(&key) {
        app.request_category_delete();
    } else if key.code == KeyCode::Esc || keys.categories.matches(&key) {
        app.close_category_manager();
    } else if keys.help.matches(&key) {
        app.open_help();
    }
}

fn handle_editor(app: &mut App, key: KeyEvent) {
    let keys = app.keys.clone();
    if keys.save.matches(&key) {
        app.save_editor();
        return;
    }
    if keys.editor_delete.matches(&key) {
        app.delete_from_editor();
        return;
    }
    if keys.help.matches(&key) {
        app.open_help();
        return;
    }
    match key.code {
        KeyCode::Esc => {
            app.close_editor();
            return;
        }
        KeyCode::Tab => {
            if let Some(editor) = app.editor.as_mut() {
                editor.next_field();
            }
            return;
        }
        KeyCode::BackTab => {
            if let Some(editor) = app.editor.as_mut() {
                editor.previous_field();
            }
            return;
        }
        _ => {}
    }

    let Some(editor) = app.editor.as_mut() else {
        app.ui.mode = Mode::List;
        return;
    };

    match editor.field {
        EditorField::Title => {
            if key.code == KeyCode::Enter || key.code == KeyCode::Down {
                editor.next_field();
            } else if handle_text_input(&mut editor.title, key) {
                editor.sync_text();
            }
        }
        EditorField::Body => {
            let at_top = editor.body.cursor_line == 0;
            if key.code == KeyCode::Up && at_top {
                editor.previous_field();
            } else if handle_text_input(&mut editor.body, key) {
                editor.sync_text();
            }
        }
        EditorField::Completed => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => editor.session.editor_mut().toggle_completed(),
            KeyCode::Up => editor.previous_field(),
            KeyCode::Down => editor.next_field(),
            _ => {}
        },
        EditorField::Priority => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                editor.session.editor_mut().cycle_priority()
            }
            KeyCode::Up => editor.previous_field(),
            KeyCode::Down => editor.next_field(),
            _ => {}
        },
        EditorField::DueDate => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => app.open_date_picker(),
            KeyCode::Up => editor.previous_field(),
            _ => {}
        },
    }
}

/// Apply an editing key to `input`. Returns `true` if the text changed.
fn handle_text_input(input: &mut TextInput, key: KeyEvent) -> bool {
    let ctrl = has_primary_modifier(key.modifiers);
    match key.code {
        KeyCode::Char(c) if !ctrl => {
            input.insert_char(c);
            true
        }
        KeyCode::Enter if input.is_multi_line() => {
            input.insert_newline();
            true
        }
        KeyCode::Backspace => {
            input.delete_char();
            true
        }
        KeyCode::Delete => {
            input.delete_forward();
            true
        }
        KeyCode::Left if ctrl => {
            input.move_cursor_word_left();
            false
        }
        KeyCode::Right if ctrl => {
            input.move_cursor_word_right();
            false
        }
        KeyCode::Left => {
            input.move_cursor_left();
            false
        }
        KeyCode::Right => {
            input.move_cursor_right();
            false
        }
        KeyCode::Up => {
            input.move_cursor_up();
            false
        }
        KeyCode::Down => {
            input.move_cursor_down();
            false
        }
        KeyCode::Home => {
            input.move_cursor_home();
            false
        }
        KeyCode::End => {
            input.move_cursor_end();
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_ignores_ctrl_chords() {
        let mut input = TextInput::single_line();
        assert!(handle_text_input(&mut input, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
        assert!(handle_text_input(&mut input, KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)));
        assert!(!handle_text_input(&mut input, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert_eq!(input.text(), "aB");
    }

    #[test]
    fn enter_only_breaks_lines_in_multi_line_inputs() {
        let mut single = TextInput::from_text("one", false);
        assert!(!handle_text_input(&mut single, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        let mut multi = TextInput::from_text("one", true);
        assert!(handle_text_input(&mut multi, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(multi.text(), "one\n");
    }
}
