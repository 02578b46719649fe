use ratatui::layout::Rect;
use std::cmp;

use crate::tui::widgets::{char_width, display_width};

/// Editable text buffer behind the search bar, the editor fields and the
/// category name prompt. `cursor_col` counts characters; `scroll_col` and
/// screen positions count terminal columns, so wide glyphs take two.
#[derive(Debug, Clone)]
pub struct TextInput {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (terminal columns)
    multi_line: bool,
}

impl TextInput {
    pub fn single_line() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            scroll_col: 0,
            multi_line: false,
        }
    }

    pub fn multi_line() -> Self {
        Self {
            multi_line: true,
            ..Self::single_line()
        }
    }

    /// Load `content` with the cursor at its end. A single-line input keeps
    /// only the first line.
    pub fn from_text(content: &str, multi_line: bool) -> Self {
        let mut lines: Vec<String> = content.split('\n').map(|s| s.to_string()).collect();
        if !multi_line {
            lines.truncate(1);
        }
        let cursor_line = lines.len().saturating_sub(1);
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
            multi_line,
        }
    }

    pub fn is_multi_line(&self) -> bool {
        self.multi_line
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
        self.scroll_col = 0;
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Ensure cursor_line is within valid bounds
    fn ensure_cursor_valid(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor_line >= self.lines.len() {
            self.cursor_line = self.lines.len() - 1;
        }
        self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.ensure_cursor_valid();
        let col = self.cursor_col;
        let line = &mut self.lines[self.cursor_line];
        let mut chars: Vec<char> = line.chars().collect();
        chars.insert(col, ch);
        *line = chars.into_iter().collect();
        self.cursor_col += 1;
    }

    /// Split the line at the cursor. Ignored by single-line inputs.
    pub fn insert_newline(&mut self) {
        if !self.multi_line {
            return;
        }
        self.ensure_cursor_valid();
        let col = self.cursor_col;
        let line = &mut self.lines[self.cursor_line];
        let mut chars: Vec<char> = line.chars().collect();
        let remainder: String = chars.split_off(col).into_iter().collect();
        *line = chars.into_iter().collect();
        self.lines.insert(self.cursor_line + 1, remainder);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col > 0 {
            let col = self.cursor_col;
            let line = &mut self.lines[self.cursor_line];
            let mut chars: Vec<char> = line.chars().collect();
            chars.remove(col - 1);
            *line = chars.into_iter().collect();
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            // Merge with previous line
            let current_line = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
            self.lines[self.cursor_line].push_str(&current_line);
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        self.ensure_cursor_valid();
        let line_len = self.current_line_len();
        if self.cursor_col < line_len {
            let col = self.cursor_col;
            let line = &mut self.lines[self.cursor_line];
            let mut chars: Vec<char> = line.chars().collect();
            chars.remove(col);
            *line = chars.into_iter().collect();
        } else if self.cursor_line + 1 < self.lines.len() {
            let next_line = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next_line);
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line < self.lines.len().saturating_sub(1) {
            self.cursor_line += 1;
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line < self.lines.len().saturating_sub(1) {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    pub fn move_cursor_word_left(&mut self) {
        if self.cursor_col == 0 {
            self.move_cursor_left();
            return;
        }
        let chars: Vec<char> = self.lines[self.cursor_line].chars().collect();
        let mut pos = cmp::min(self.cursor_col, chars.len());
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        self.cursor_col = pos;
    }

    pub fn move_cursor_word_right(&mut self) {
        let line_len = self.current_line_len();
        if self.cursor_col >= line_len {
            self.move_cursor_right();
            return;
        }
        let chars: Vec<char> = self.lines[self.cursor_line].chars().collect();
        let mut pos = self.cursor_col;
        while pos < chars.len() && is_word_char(chars[pos]) {
            pos += 1;
        }
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        // Always make progress over punctuation
        if pos == self.cursor_col {
            pos += 1;
        }
        self.cursor_col = pos;
    }

    /// Terminal column of the cursor within its line
    pub fn cursor_display_col(&self) -> usize {
        self.lines
            .get(self.cursor_line)
            .map(|line| {
                let end = line
                    .char_indices()
                    .nth(self.cursor_col)
                    .map(|(index, _)| index)
                    .unwrap_or(line.len());
                display_width(&line[..end])
            })
            .unwrap_or(0)
    }

    /// Keep the cursor inside a viewport of `height` lines and `width` columns
    pub fn update_scroll(&mut self, height: usize, width: usize) {
        let height = height.max(1);
        let width = width.max(1);
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + height {
            self.scroll_offset = self.cursor_line + 1 - height;
        }
        let cursor_x = self.cursor_display_col();
        if cursor_x < self.scroll_col {
            self.scroll_col = cursor_x;
        } else if cursor_x >= self.scroll_col + width {
            self.scroll_col = cursor_x + 1 - width;
        }
    }

    /// Lines visible in a viewport, already cut to the horizontal scroll
    pub fn visible_lines(&self, height: usize, width: usize) -> Vec<String> {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + height, self.lines.len());
        self.lines[start..end]
            .iter()
            .map(|line| clip_columns(line, self.scroll_col, width))
            .collect()
    }

    /// Terminal position of the cursor inside `inner` (an area without
    /// borders), or `None` when it is scrolled out of view
    pub fn cursor_screen_pos(&self, inner: Rect) -> Option<(u16, u16)> {
        let row = self.cursor_line.checked_sub(self.scroll_offset)?;
        let col = self.cursor_display_col().checked_sub(self.scroll_col)?;
        if row >= inner.height as usize || col >= inner.width as usize {
            return None;
        }
        Some((inner.x + col as u16, inner.y + row as u16))
    }
}

/// Columns `skip..skip + width` of `line`. A wide glyph cut by the left
/// edge shows as blanks; one cut by the right edge is dropped.
fn clip_columns(line: &str, skip: usize, width: usize) -> String {
    let end = skip + width;
    let mut out = String::new();
    let mut col = 0;
    for ch in line.chars() {
        let w = char_width(ch);
        let next = col + w;
        if next > end {
            break;
        }
        if col >= skip {
            out.push(ch);
        } else if next > skip {
            out.extend(std::iter::repeat_n(' ', next - skip));
        }
        col = next;
    }
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
