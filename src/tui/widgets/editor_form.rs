use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::todo_editor::{EditorKind, EditorState, TodoEditor};
use crate::tui::app::{EditorField, EditorUi};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::text_input::TextInput;
use crate::Config;

/// Rows used by the completion/priority/due date block, borders included
const DETAILS_HEIGHT: u16 = 5;

fn form_title(editor: &TodoEditor) -> String {
    let noun = match editor.kind() {
        EditorKind::Note => "note",
        EditorKind::Todo => "todo",
    };
    let state = match editor.state() {
        EditorState::Saved => " (saved)",
        EditorState::Deleted => " (deleted)",
        EditorState::Loading | EditorState::Ready => "",
    };
    format!("Edit {} #{}{}", noun, editor.id(), state)
}

/// Text lines for the todo-only fields
pub fn detail_lines(editor: &TodoEditor) -> [String; 3] {
    let completed = format!("[{}] Completed", if editor.is_completed() { "x" } else { " " });
    let priority = format!("Priority: {}", editor.resolved_priority().label());
    let due = editor.due_date_display();
    let due = if due.is_empty() {
        "Due: none".to_string()
    } else {
        format!("Due: {}", due)
    };
    [completed, priority, due]
}

pub fn render_editor_form(f: &mut Frame, area: Rect, editor: &mut EditorUi, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(form_title(editor.session.editor()))
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let is_todo = editor.kind() == EditorKind::Todo;
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(3)];
    if is_todo {
        constraints.push(Constraint::Length(DETAILS_HEIGHT));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let border_style = |field: EditorField| {
        if editor.field == field {
            Style::default().fg(accent)
        } else {
            Style::default().fg(fg_color)
        }
    };
    let title_border = border_style(EditorField::Title);
    let body_border = border_style(EditorField::Body);
    let focused = editor.field;

    let mut cursor = render_text_field(f, chunks[0], "Title", &mut editor.title, title_border);
    let body_cursor = render_text_field(f, chunks[1], "Body", &mut editor.body, body_border);
    if focused == EditorField::Body {
        cursor = body_cursor;
    }

    if is_todo {
        let fields = [EditorField::Completed, EditorField::Priority, EditorField::DueDate];
        let lines: Vec<Line> = detail_lines(editor.session.editor())
            .into_iter()
            .zip(fields)
            .map(|(text, field)| {
                if focused == field {
                    Line::from(Span::styled(
                        format!("> {}", text),
                        Style::default()
                            .fg(highlight_fg)
                            .bg(highlight_bg)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", text))
                }
            })
            .collect();
        let details = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Details")
                .border_style(Style::default().fg(fg_color)),
        );
        f.render_widget(details, chunks[2]);
    }

    if matches!(focused, EditorField::Title | EditorField::Body) {
        if let Some((x, y)) = cursor {
            f.set_cursor_position((x, y));
        }
    }
}

/// Draw one bordered text field and return where its cursor would sit
fn render_text_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    input: &mut TextInput,
    border_style: Style,
) -> Option<(u16, u16)> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(label.to_string())
        .border_style(border_style);
    let inner = block.inner(area);
    let (height, width) = (inner.height as usize, inner.width as usize);
    input.update_scroll(height, width);
    let lines: Vec<Line> = input
        .visible_lines(height, width)
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
    input.cursor_screen_pos(inner)
}
