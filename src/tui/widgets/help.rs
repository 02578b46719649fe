use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as display;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 80);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let mut text = String::new();

    text.push_str("List:\n");
    text.push_str(&format!(
        "  {} / {}: Move up/down\n",
        display(&keys.list_up),
        display(&keys.list_down)
    ));
    text.push_str(&format!("  {}: Open\n", display(&keys.open)));
    text.push_str(&format!("  {}: Row actions\n", display(&keys.context_menu)));
    text.push_str(&format!("  {}: New note\n", display(&keys.new_note)));
    text.push_str(&format!("  {}: New todo\n", display(&keys.new_todo)));
    text.push_str(&format!("  {}: Toggle todo complete\n", display(&keys.toggle_complete)));
    text.push_str(&format!("  {}: Delete\n", display(&keys.delete)));
    text.push_str(&format!("  {}: Copy link\n", display(&keys.copy)));
    text.push_str(&format!("  {}: Paste as new note\n", display(&keys.paste)));
    text.push('\n');

    text.push_str("Filters:\n");
    text.push_str(&format!("  {}: Search (Enter applies, Esc hides)\n", display(&keys.search)));
    text.push_str(&format!("  {}: Filter by category\n", display(&keys.category_filter)));
    text.push_str(&format!("  {}: Show notes/todos\n", display(&keys.todo_filter)));
    text.push_str(&format!("  {}: Manage categories\n", display(&keys.categories)));
    text.push('\n');

    text.push_str("Editor:\n");
    text.push_str("  Tab / Shift+Tab: Next/previous field\n");
    text.push_str(&format!("  {}: Save and close\n", display(&keys.save)));
    text.push_str(&format!("  {}: Delete entry\n", display(&keys.editor_delete)));
    text.push_str("  Space/Enter on a detail: Toggle, cycle priority, pick date\n");
    text.push_str("  Esc: Save and close\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", display(&keys.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", display(&keys.help)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_configured_keys() {
        let mut config = Config::default();
        config.key_bindings.new_todo = "T".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("  T: New todo"));
        assert!(text.contains("Esc: Save and close"));
        assert!(text.contains("  p: Paste as new note"));
    }
}
