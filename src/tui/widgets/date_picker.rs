use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::DatePickerState;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::fixed_popup_area;
use crate::Config;

const WEEKDAY_HEADER: &str = "Mo Tu We Th Fr Sa Su";
// 7 columns of 3 plus borders
const PICKER_WIDTH: u16 = 24;
// title, header, up to 6 weeks, hint, borders
const PICKER_HEIGHT: u16 = 11;

/// Weeks of the month containing `date`, Monday first. Days outside the
/// month are `None`.
pub fn month_grid(date: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let Some(first) = date.with_day(1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_monday() as usize;
    let days = days_in_month(date);

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut column = offset;
    for day in 1..=days {
        week[column] = Some(day);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn render_date_picker(f: &mut Frame, area: Rect, picker: &DatePickerState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = fixed_popup_area(area, PICKER_WIDTH, PICKER_HEIGHT);
    f.render_widget(Clear, popup_area);

    let selected = picker.selected;
    let mut lines = vec![
        Line::from(Span::styled(
            selected.format("%B %Y").to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(WEEKDAY_HEADER),
    ];
    for week in month_grid(selected) {
        let mut spans = Vec::with_capacity(14);
        for (column, day) in week.iter().enumerate() {
            if column > 0 {
                spans.push(Span::raw(" "));
            }
            let text = day.map(|d| format!("{:>2}", d)).unwrap_or_else(|| "  ".to_string());
            let style = if *day == Some(selected.day()) {
                Style::default().fg(highlight_fg).bg(highlight_bg)
            } else {
                Style::default().fg(fg_color)
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Due date")
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from("Enter pick • Esc cancel").centered())
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_starts_on_the_right_weekday() {
        // 2024-02-01 is a Thursday; February 2024 has 29 days
        let grid = month_grid(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(grid[0], [None, None, None, Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[4][3], Some(29));
        assert_eq!(grid[4][4], None);
    }

    #[test]
    fn december_has_thirty_one_days() {
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2023, 12, 5).unwrap()), 31);
    }
}
