use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::models::Notice;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::{display_width, take_width, truncate_with_ellipsis};
use crate::Config;

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    notice: Option<&Notice>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let max_width = area.width as usize;

    let (content, style) = match notice {
        Some(notice) => {
            // Errors always stand out, whatever the theme
            let bg = if notice.is_error() { Color::Red } else { highlight_bg };
            let style = Style::default()
                .fg(get_contrast_text_color(bg))
                .bg(bg)
                .add_modifier(Modifier::BOLD);
            (truncate_with_ellipsis(&notice.message, max_width), style)
        }
        None => (fit_hints(key_hints, max_width), Style::default().fg(fg_color).bg(bg_color)),
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

/// Join as many hints as fit in `max_width`, ending in "..." when some were
/// dropped
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let separator_len = display_width(SEPARATOR);
    let ellipsis_len = display_width(ELLIPSIS);
    let mut hints_text = String::new();

    for (i, hint) in key_hints.iter().enumerate() {
        let hint_len = display_width(hint);
        let current_len = display_width(&hints_text);
        let would_be_len = if i == 0 {
            hint_len
        } else {
            current_len + separator_len + hint_len
        };

        if would_be_len > max_width {
            if hints_text.is_empty() {
                hints_text = take_width(hint, max_width.saturating_sub(ellipsis_len)).to_string();
            } else if current_len + ellipsis_len > max_width {
                hints_text = take_width(&hints_text, max_width.saturating_sub(ellipsis_len)).to_string();
            }
            hints_text.push_str(ELLIPSIS);
            break;
        }

        if i > 0 {
            hints_text.push_str(SEPARATOR);
        }
        hints_text.push_str(hint);
    }
    hints_text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["q: Quit".to_string(), "n: New note".to_string(), "t: New todo".to_string()]
    }

    #[test]
    fn all_hints_fit_on_a_wide_bar() {
        assert_eq!(fit_hints(&hints(), 80), "q: Quit • n: New note • t: New todo");
    }

    #[test]
    fn narrow_bar_ends_with_ellipsis() {
        let text = fit_hints(&hints(), 24);
        assert_eq!(text, "q: Quit • n: New note...");
        assert!(display_width(&text) <= 24);
    }

    #[test]
    fn wide_hints_are_measured_in_columns() {
        let hints = vec!["新: 新笔记".to_string(), "q: Quit".to_string()];
        let text = fit_hints(&hints, 12);
        assert_eq!(text, "新: 新笔...");
        assert!(display_width(&text) <= 12);
    }
}
