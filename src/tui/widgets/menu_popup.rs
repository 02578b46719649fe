use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::{display_width, fixed_popup_area};
use crate::Config;

/// Option list popup shared by the filter menus, the category picker and the
/// row context menu.
pub fn render_menu_popup(
    f: &mut Frame,
    area: Rect,
    title: &str,
    labels: &[String],
    selected: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let widest = labels
        .iter()
        .map(|l| display_width(l))
        .chain(std::iter::once(display_width(title)))
        .max()
        .unwrap_or(0);
    // borders + "> " prefix + padding
    let width = (widest + 6).max(24) as u16;
    let height = (labels.len() + 2) as u16;
    let popup_area = fixed_popup_area(area, width, height);

    f.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = labels
        .iter()
        .map(|label| ListItem::new(format!(" {}", label)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg))
        .highlight_symbol(">");

    let mut state = ListState::default();
    state.select(Some(selected.min(labels.len().saturating_sub(1))));
    f.render_stateful_widget(list, popup_area, &mut state);
}
