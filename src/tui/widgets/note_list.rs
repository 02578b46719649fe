use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, StatefulWidget,
};
use ratatui::Frame;

use crate::presenter::{RowStyle, RowView};
use crate::tui::widgets::color::{blend, get_contrast_text_color, parse_color};
use crate::tui::widgets::{display_width, truncate_with_ellipsis};
use crate::Config;

/// Lines each row takes in the list
const ROW_HEIGHT: usize = 2;

/// Row title cut so that it, a space and `timestamp` fit in `max_width` columns
pub fn fit_title(title: &str, timestamp: &str, max_width: usize) -> String {
    let title_width = max_width.saturating_sub(display_width(timestamp) + 1);
    truncate_with_ellipsis(title, title_width)
}

/// Title style for a row: completed todos are struck through and faded
/// toward the background, or DIM on terminals without true color.
pub fn title_style(row_style: RowStyle, fg: ratatui::style::Color, bg: ratatui::style::Color) -> Style {
    let mut style = Style::default().fg(fg).add_modifier(Modifier::BOLD);
    if row_style.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if row_style.is_dimmed() {
        style = match blend(fg, bg, row_style.alpha) {
            Some(faded) => style.fg(faded),
            None => style.add_modifier(Modifier::DIM),
        };
    }
    style
}

pub fn render_note_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[RowView],
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    if rows.is_empty() {
        let paragraph = Paragraph::new("No notes here yet. Press the new note or new todo key to add one.")
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .style(Style::default().fg(fg_color).bg(bg_color))
            .wrap(ratatui::widgets::Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    // Reserve space for the scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    // 2 for borders, 2 for padding
    let max_width = list_area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let first_line = Line::from(vec![
                Span::styled(
                    fit_title(&row.title, &row.timestamp, max_width),
                    title_style(row.style, fg_color, bg_color),
                ),
                Span::raw(" "),
                Span::styled(row.timestamp.clone(), Style::default().fg(accent)),
            ]);
            let second_line = Line::from(Span::raw(format!(
                "  {}",
                truncate_with_ellipsis(&row.preview, max_width.saturating_sub(2))
            )));
            ListItem::new(vec![first_line, second_line])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let total_items = rows.len();
    let visible_items = list_area.height.saturating_sub(2) as usize / ROW_HEIGHT;

    if total_items > visible_items && visible_items > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );
        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = selected_index.saturating_sub(visible_items - 1);

        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}
