use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::text_input::TextInput;
use crate::Config;

/// Search box above the list. The cursor is only placed while the box has
/// focus.
pub fn render_search_bar(f: &mut Frame, area: Rect, input: &mut TextInput, focused: bool, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let border_color = if focused {
        parse_color(&active_theme.accent)
    } else {
        fg_color
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search")
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    input.update_scroll(1, inner.width as usize);
    let visible = input.visible_lines(1, inner.width as usize).join("");

    let paragraph = Paragraph::new(visible)
        .block(block)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(paragraph, area);

    if focused {
        if let Some((x, y)) = input.cursor_screen_pos(inner) {
            f.set_cursor_position((x, y));
        }
    }
}
