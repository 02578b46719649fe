use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::models::Category;
use crate::tui::app::{CategoryManagerState, CategoryPrompt};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;
use crate::Config;

/// Confirmation text for deleting a category holding `note_count` notes
pub fn delete_prompt(name: &str, note_count: i64) -> String {
    match note_count {
        0 => format!("Delete \"{}\"? (y/n)", name),
        1 => format!("Delete \"{}\"? 1 note becomes uncategorized. (y/n)", name),
        n => format!("Delete \"{}\"? {} notes become uncategorized. (y/n)", name, n),
    }
}

pub fn render_category_manager(
    f: &mut Frame,
    area: Rect,
    categories: &[Category],
    state: &mut CategoryManagerState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = popup_area(area, 50, 60);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Categories")
        .title_alignment(Alignment::Center)
        .title_bottom(Line::from("a add • r rename • d delete • Esc close").centered())
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    let items: Vec<ListItem> = if categories.is_empty() {
        vec![ListItem::new("No categories")]
    } else {
        categories.iter().map(|c| ListItem::new(c.name.clone())).collect()
    };
    let list = List::new(items)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut state.list_state);

    if let Some((id, count)) = state.pending_delete {
        let name = categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or_default();
        let paragraph = Paragraph::new(delete_prompt(name, count))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(accent)))
            .wrap(ratatui::widgets::Wrap { trim: true });
        f.render_widget(paragraph, chunks[1]);
    } else if let Some(prompt) = state.prompt {
        let label = match prompt {
            CategoryPrompt::Add => "New category",
            CategoryPrompt::Rename(_) => "Rename to",
        };
        let field_block = Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(Style::default().fg(accent));
        let field_inner = field_block.inner(chunks[1]);
        let input = &mut state.name_input;
        input.update_scroll(1, field_inner.width as usize);
        let text = input.visible_lines(1, field_inner.width as usize).join("");
        f.render_widget(Paragraph::new(text).block(field_block), chunks[1]);
        if let Some((x, y)) = input.cursor_screen_pos(field_inner) {
            f.set_cursor_position((x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_prompt_mentions_moved_notes() {
        assert_eq!(delete_prompt("Work", 0), "Delete \"Work\"? (y/n)");
        assert!(delete_prompt("Work", 1).contains("1 note becomes"));
        assert!(delete_prompt("Work", 4).contains("4 notes become"));
    }
}
