use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Header height, borders included
const HEADER_HEIGHT: u16 = 3;

/// Status bar height
const STATUS_HEIGHT: u16 = 1;

/// Table borders plus the column header row
const TABLE_CHROME: u16 = 3;

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Create the main layout with header, content, and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Number of ranked lines that fit a terminal of the given height
    pub fn table_rows(height: u16) -> usize {
        height.saturating_sub(HEADER_HEIGHT + STATUS_HEIGHT + TABLE_CHROME) as usize
    }

    /// Create a centered popup area
    pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }
}
