use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub search_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Width: room for a row timestamp plus a short title
    /// Height: search bar (3) + two list rows with borders (6) + status (1)
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 10;

    /// Search bar height when visible (borders + 1 line)
    const SEARCH_HEIGHT: u16 = 3;

    pub fn calculate(size: Rect, search_visible: bool) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let search_height = if search_visible { Self::SEARCH_HEIGHT } else { 0 };
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(search_height),
                Constraint::Min(1),
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            search_area: vertical[0],
            main_area: vertical[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_search_gives_the_list_all_rows() {
        let layout = Layout::calculate(Rect::new(0, 0, 80, 24), false);
        assert_eq!(layout.search_area.height, 0);
        assert_eq!(layout.main_area.height, 21);
        assert_eq!(layout.status_area.y, 22);
    }

    #[test]
    fn visible_search_sits_above_the_list() {
        let layout = Layout::calculate(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.search_area, Rect::new(1, 1, 78, 3));
        assert_eq!(layout.main_area.y, 4);
    }
}
