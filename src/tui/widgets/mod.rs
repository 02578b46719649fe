pub mod category_manager;
pub mod color;
pub mod date_picker;
pub mod editor_form;
pub mod help;
pub mod menu_popup;
pub mod note_list;
pub mod search_bar;
pub mod status_bar;
pub mod text_input;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::Span;

const ELLIPSIS: &str = "...";

/// Centered rect using a percentage of the available rect.
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Centered rect with a fixed size, clamped to `area`
pub fn fixed_popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))]).flex(Flex::Center);
    let horizontal =
        Layout::horizontal([Constraint::Length(width.min(area.width))]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Terminal columns `text` occupies. Wide glyphs (CJK, most emoji) take two.
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

pub fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Longest prefix of `text` that fits in `max_width` columns
pub fn take_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (index, c) in text.char_indices() {
        used += char_width(c);
        if used > max_width {
            return &text[..index];
        }
    }
    text
}

/// Cut `text` to `max_width` columns, ending in "..." when cut
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) > max_width {
        take_width(text, max_width.saturating_sub(ELLIPSIS.len())).to_string() + ELLIPSIS
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_short_text() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a longer title", 8), "a lon...");
    }

    #[test]
    fn wide_glyphs_count_two_columns() {
        assert_eq!(display_width("新笔记"), 6);
        assert_eq!(display_width("abc"), 3);

        let cut = truncate_with_ellipsis("新笔记新笔记新笔记新笔记", 10);
        assert_eq!(cut, "新笔记...");
        assert!(display_width(&cut) <= 10);

        // A wide glyph that would straddle the limit is dropped whole
        assert_eq!(take_width("ab新", 3), "ab");
        assert_eq!(truncate_with_ellipsis("新笔记", 6), "新笔记");
    }

    #[test]
    fn fixed_popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(fixed_popup_area(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(fixed_popup_area(area, 80, 40), area);
    }
}
