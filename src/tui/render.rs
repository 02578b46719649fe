use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::tui::app::{EditorField, Mode};
use crate::tui::widgets::{
    category_manager::render_category_manager, color::parse_color, date_picker::render_date_picker,
    editor_form::render_editor_form, help::render_help, menu_popup::render_menu_popup,
    note_list::render_note_list, search_bar::render_search_bar, status_bar::render_status_bar,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as display;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("notepad")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    if app.list.is_search_visible() && layout.search_area.height > 0 {
        let focused = app.ui.mode == Mode::Search;
        render_search_bar(f, layout.search_area, &mut app.search_input, focused, &app.config);
    }

    // The editor replaces the list while open
    if let Some(editor) = app.editor.as_mut() {
        render_editor_form(f, layout.main_area, editor, &app.config);
    } else {
        let title = app.list.screen_title();
        let rows = app.list.present_rows(&*app.store);
        render_note_list(f, layout.main_area, &title, &rows, &mut app.ui.list_state, &app.config);
    }

    match app.ui.mode {
        Mode::Menu => {
            if let Some(popup) = app.menu.as_ref() {
                render_menu_popup(f, f.area(), &popup.title, &popup.labels(), popup.selected, &app.config);
            }
        }
        Mode::DatePicker => {
            if let Some(picker) = app.date_picker.as_ref() {
                render_date_picker(f, f.area(), picker, &app.config);
            }
        }
        Mode::Categories => {
            render_category_manager(f, f.area(), &app.categories, &mut app.category_manager, &app.config);
        }
        Mode::Help => render_help(f, f.area(), &app.config),
        Mode::List | Mode::Search | Mode::Editor => {}
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.notice.as_ref(), &key_hints, &app.config);
}

pub fn get_key_hints(app: &App) -> Vec<String> {
    let keys = &app.config.key_bindings;
    match app.ui.mode {
        Mode::List => vec![
            format!("{}: Quit", display(&keys.quit)),
            format!("{}: Note", display(&keys.new_note)),
            format!("{}: Todo", display(&keys.new_todo)),
            format!("{}: Open", display(&keys.open)),
            format!("{}: Actions", display(&keys.context_menu)),
            format!("{}: Search", display(&keys.search)),
            format!("{}: Category", display(&keys.category_filter)),
            format!("{}: Show", display(&keys.todo_filter)),
            format!("{}: Complete", display(&keys.toggle_complete)),
            format!("{}: Paste", display(&keys.paste)),
            format!("{}: Help", display(&keys.help)),
        ],
        Mode::Search => vec!["Enter: Apply".to_string(), "Esc: Hide search".to_string()],
        Mode::Menu => vec![
            "↑/↓: Choose".to_string(),
            "Enter: Select".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Editor => {
            let mut hints = vec![
                "Tab: Next field".to_string(),
                format!("{}: Save", display(&keys.save)),
                format!("{}: Delete", display(&keys.editor_delete)),
                "Esc: Close".to_string(),
            ];
            if let Some(editor) = app.editor.as_ref() {
                match editor.field {
                    EditorField::Completed => hints.insert(0, "Space: Toggle".to_string()),
                    EditorField::Priority => hints.insert(0, "Space: Cycle".to_string()),
                    EditorField::DueDate => hints.insert(0, "Enter: Pick date".to_string()),
                    EditorField::Title | EditorField::Body => {}
                }
            }
            hints
        }
        Mode::DatePicker => vec![
            "←/→: Day".to_string(),
            "↑/↓: Week".to_string(),
            "PgUp/PgDn: Month".to_string(),
            "Enter: Pick".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Categories => vec![
            "a: Add".to_string(),
            "r: Rename".to_string(),
            "d: Delete".to_string(),
            "Esc: Close".to_string(),
        ],
        Mode::Help => vec![format!("Esc or {}: Exit help", display(&keys.help))],
    }
}
